//! Interactive session over one flash device.
//!
//! The session owns a [`FlashlightDriver`] wired to the selected line
//! backend, with the mock attribute tree and LED registry standing in for
//! user space. Each input line is one [`Command`].

use std::str::FromStr;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use flashlight_core::Error;
use flashlight_driver::{FlashlightDriver, Platform, PlatformDevice};
use flashlight_hardware::AnyLineController;
use flashlight_hardware::mock::{MockAttributeTree, MockLedRegistry};
use tracing::debug;

use crate::config::{CliConfig, DeviceConfig};

pub const HELP: &str = "\
commands:
  attach            attach the configured device
  detach            detach it
  read              read flash_on
  write <text>      write text to flash_on
  brightness <n>    set led:torch brightness
  status            print device status as JSON
  help              show this text
  quit              exit";

/// One session command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Attach,
    Detach,
    Read,
    Write(String),
    Brightness(u32),
    Status,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim_start()),
            None => (line, ""),
        };

        let command = match word {
            "attach" => Self::Attach,
            "detach" => Self::Detach,
            "read" => Self::Read,
            "write" => Self::Write(rest.to_string()),
            "brightness" => Self::Brightness(
                rest.parse()
                    .with_context(|| format!("invalid brightness {rest:?}"))?,
            ),
            "status" => Self::Status,
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            "" => bail!("empty command"),
            other => bail!("unknown command {other:?}, try help"),
        };
        Ok(command)
    }
}

pub struct Session {
    driver: FlashlightDriver,
    device: DeviceConfig,
    tree: MockAttributeTree,
    leds: MockLedRegistry,
    backend: &'static str,
}

impl Session {
    pub fn new(config: CliConfig, lines: AnyLineController) -> Self {
        let tree = MockAttributeTree::new();
        let leds = MockLedRegistry::new();
        let backend = lines.backend();
        let platform = Platform::new(
            Arc::new(lines),
            Arc::new(tree.clone()),
            Arc::new(leds.clone()),
        );

        Self {
            driver: FlashlightDriver::new(config.driver, platform),
            device: config.device,
            tree,
            leds,
            backend,
        }
    }

    pub fn backend(&self) -> &'static str {
        self.backend
    }

    pub fn device_name(&self) -> &str {
        &self.device.name
    }

    /// Parse and run one input line. Returns `None` for `quit`.
    pub fn execute(&self, line: &str) -> Result<Option<String>> {
        match line.parse::<Command>()? {
            Command::Quit => Ok(None),
            command => self.run(&command).map(Some),
        }
    }

    pub fn run(&self, command: &Command) -> Result<String> {
        debug!("command {:?}", command);
        match command {
            Command::Attach => {
                let device = PlatformDevice::new(
                    self.device.name.clone(),
                    self.device.compatible.clone(),
                    Arc::new(self.device.gpios.clone()),
                );
                self.driver.probe(device)?;
                let status = self.status()?;
                Ok(format!(
                    "attached {} (flash_en {}, flash_now {})",
                    status.name, status.enable_line, status.trigger_line
                ))
            }
            Command::Detach => {
                self.driver.remove(&self.device.name)?;
                Ok(format!("detached {}", self.device.name))
            }
            Command::Read => {
                let text = self.tree.read(&self.attribute_path())?;
                Ok(text.trim_end().to_string())
            }
            Command::Write(text) => {
                let written = self.tree.write(&self.attribute_path(), text)?;
                Ok(format!("wrote {written} bytes"))
            }
            Command::Brightness(value) => {
                let name = &self.driver.config().torch.name;
                self.leds
                    .set_brightness(name, *value)
                    .map_err(Error::from)?;
                let applied = self.leds.brightness(name).map_err(Error::from)?;
                Ok(format!("{name} brightness {applied}"))
            }
            Command::Status => Ok(serde_json::to_string_pretty(&self.status()?)?),
            Command::Help => Ok(HELP.to_string()),
            Command::Quit => Ok(String::new()),
        }
    }

    /// Detach whatever is still attached.
    pub fn shutdown(&self) {
        self.driver.shutdown();
    }

    fn status(&self) -> Result<flashlight_driver::DeviceStatus> {
        self.driver
            .status(&self.device.name)
            .ok_or_else(|| Error::UnknownDevice(self.device.name.clone()).into())
    }

    fn attribute_path(&self) -> String {
        let attribute = &self.driver.config().attribute;
        format!("{}/{}", attribute.dir, attribute.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flashlight_core::{LineId, LineValue};
    use flashlight_hardware::mock::MockGpioChip;
    use rstest::rstest;

    fn session() -> (Session, MockGpioChip) {
        let chip = MockGpioChip::default();
        let session = Session::new(CliConfig::default(), chip.clone().into());
        (session, chip)
    }

    fn exec(session: &Session, line: &str) -> Result<String> {
        session
            .execute(line)
            .map(|output| output.expect("session ended"))
    }

    fn line(n: i64) -> LineId {
        LineId::new(n).unwrap()
    }

    #[rstest]
    #[case("attach", Command::Attach)]
    #[case("  detach  ", Command::Detach)]
    #[case("read", Command::Read)]
    #[case("write 1", Command::Write("1".to_string()))]
    #[case("write   abc", Command::Write("abc".to_string()))]
    #[case("write", Command::Write(String::new()))]
    #[case("brightness 1", Command::Brightness(1))]
    #[case("status", Command::Status)]
    #[case("?", Command::Help)]
    #[case("quit", Command::Quit)]
    #[case("exit", Command::Quit)]
    fn test_parse_command(#[case] input: &str, #[case] expected: Command) {
        assert_eq!(input.parse::<Command>().unwrap(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("flash")]
    #[case("brightness")]
    #[case("brightness -1")]
    #[case("brightness high")]
    fn test_parse_command_invalid(#[case] input: &str) {
        assert!(input.parse::<Command>().is_err());
    }

    #[test]
    fn test_session_flow() {
        let (session, chip) = session();
        assert_eq!(session.backend(), "mock");

        assert_eq!(
            exec(&session, "attach").unwrap(),
            "attached camera-flash (flash_en 12, flash_now 13)"
        );
        assert_eq!(exec(&session, "read").unwrap(), "0");
        assert_eq!(exec(&session, "write 1").unwrap(), "wrote 1 bytes");
        assert_eq!(exec(&session, "read").unwrap(), "1");
        assert_eq!(
            exec(&session, "brightness 5").unwrap(),
            "led:torch brightness 1"
        );
        assert_eq!(chip.value(line(13)), Some(LineValue::HIGH));

        let status: serde_json::Value =
            serde_json::from_str(&exec(&session, "status").unwrap()).unwrap();
        assert_eq!(status["state"], "active");
        assert_eq!(status["enable_value"], 1);

        assert_eq!(exec(&session, "detach").unwrap(), "detached camera-flash");
        assert_eq!(chip.requested_count(), 0);
    }

    #[test]
    fn test_errors_do_not_end_the_session() {
        let (session, _chip) = session();

        assert!(exec(&session, "read").is_err());
        assert!(exec(&session, "detach").is_err());
        assert!(exec(&session, "status").is_err());

        exec(&session, "attach").unwrap();
        assert!(exec(&session, "attach").is_err());
        assert!(exec(&session, "write on").is_err());
        assert_eq!(exec(&session, "read").unwrap(), "0");
    }

    #[test]
    fn test_quit_ends_the_session() {
        let (session, _chip) = session();
        assert_eq!(session.execute("quit").unwrap(), None);
        assert_eq!(session.execute("help").unwrap().as_deref(), Some(HELP));
    }

    #[test]
    fn test_shutdown_releases_lines() {
        let (session, chip) = session();
        exec(&session, "attach").unwrap();
        session.shutdown();
        assert_eq!(chip.requested_count(), 0);
    }
}
