use crate::application::session::{PayOutcome, SessionController};
use crate::domain::payment::Amount;
use crate::error::{Result, StorefrontError};
use rust_decimal::Decimal;
use std::io::{BufRead, Write};

enum Flow {
    Continue,
    Quit,
}

/// Line-oriented interactive front end for a `SessionController`.
///
/// Reads commands from any `BufRead` and writes prompts and messages to any
/// `Write`, so it runs the same against a terminal or a test buffer. End of
/// input is treated as `quit`.
pub struct Shell<R: BufRead, W: Write> {
    controller: SessionController,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(controller: SessionController, input: R, output: W) -> Self {
        Self {
            controller,
            input,
            output,
        }
    }

    pub fn into_controller(self) -> SessionController {
        self.controller
    }

    pub async fn run(&mut self) -> Result<()> {
        writeln!(self.output, "Welcome to the E-Commerce App")?;
        loop {
            let Some(action) = self.prompt("Choose action: [signup/login/quit]: ")? else {
                break;
            };
            let flow = match action.trim() {
                "signup" => self.signup().await?,
                "login" => self.login().await?,
                "quit" => Flow::Quit,
                "" => Flow::Continue,
                other => {
                    writeln!(self.output, "Unknown action: {other}")?;
                    Flow::Continue
                }
            };
            if let Flow::Quit = flow {
                break;
            }
        }
        Ok(())
    }

    /// Writes `message`, then reads one line without its line terminator.
    fn prompt(&mut self, message: &str) -> Result<Option<String>> {
        write!(self.output, "{message}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed_len = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed_len);
        Ok(Some(line))
    }

    fn credentials(&mut self) -> Result<Option<(String, String)>> {
        let Some(username) = self.prompt("Username: ")? else {
            return Ok(None);
        };
        let Some(password) = self.prompt("Password: ")? else {
            return Ok(None);
        };
        Ok(Some((username, password)))
    }

    async fn signup(&mut self) -> Result<Flow> {
        let Some((username, password)) = self.credentials()? else {
            return Ok(Flow::Quit);
        };
        match self.controller.signup(&username, &password).await {
            Ok(()) => writeln!(self.output, "User registered successfully.")?,
            Err(StorefrontError::DuplicateUsername) => {
                writeln!(self.output, "Username already exists.")?
            }
            Err(StorefrontError::InvalidUsername) => {
                writeln!(self.output, "Username must not be empty.")?
            }
            Err(e) => return Err(e),
        }
        Ok(Flow::Continue)
    }

    async fn login(&mut self) -> Result<Flow> {
        let Some((username, password)) = self.credentials()? else {
            return Ok(Flow::Quit);
        };
        match self.controller.login(&username, &password).await {
            Ok(user) => {
                writeln!(self.output, "Welcome back, {user}!")?;
                self.shop().await
            }
            Err(StorefrontError::InvalidCredentials) => {
                writeln!(self.output, "Invalid credentials.")?;
                Ok(Flow::Continue)
            }
            Err(e) => Err(e),
        }
    }

    /// Relays whatever the processor reported, if anything.
    fn announce(&mut self, announcement: Option<String>) -> Result<()> {
        if let Some(line) = announcement {
            writeln!(self.output, "{line}")?;
        }
        Ok(())
    }

    async fn shop(&mut self) -> Result<Flow> {
        loop {
            let Some(line) = self.prompt("Enter amount to pay (or 0 to logout): ")? else {
                return Ok(Flow::Quit);
            };
            // Exact parsing: input that would round (e.g. to zero) is rejected.
            let Ok(value) = Decimal::from_str_exact(line.trim()) else {
                writeln!(self.output, "Invalid amount.")?;
                continue;
            };
            if value.is_zero() {
                self.controller.pay(value, "").await?;
                writeln!(self.output, "Logging out.")?;
                return Ok(Flow::Continue);
            }
            if Amount::new(value).is_err() {
                writeln!(self.output, "Invalid amount.")?;
                continue;
            }

            let Some(method) = self.prompt("Choose payment method (card/paypal): ")? else {
                return Ok(Flow::Quit);
            };
            match self.controller.pay(value, &method).await {
                Ok(PayOutcome::Recorded { announcement, .. }) => {
                    self.announce(announcement)?;
                    writeln!(self.output, "Payment successful!")?;
                }
                Ok(PayOutcome::Declined { announcement, .. }) => {
                    self.announce(announcement)?;
                    writeln!(self.output, "Payment declined.")?;
                }
                Ok(PayOutcome::LoggedOut) => {
                    writeln!(self.output, "Logging out.")?;
                    return Ok(Flow::Continue);
                }
                Err(StorefrontError::UnrecognizedPaymentMethod(_)) => {
                    writeln!(self.output, "Invalid method.")?;
                }
                Err(StorefrontError::InvalidAmount(_)) => {
                    writeln!(self.output, "Invalid amount.")?;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
