//! Console commands typed at the prompt.

use std::path::PathBuf;

use client_core::SessionField;
use thiserror::Error;

pub const HELP: &str = "\
commands:
  generate                 request a new RSA key pair
  message <text>           set the plaintext to encrypt
  ciphertext <text>        set the ciphertext to decrypt
  public-key <text>        replace the public key
  private-key <text>       replace the private key
  encrypt                  encrypt the message with the public key
  decrypt                  decrypt the ciphertext with the private key
  copy <field>             copy public|private|message|encrypted|decrypted
  export [dir]             save the event log as firewall_logs.txt
  show                     print the session fields
  logs                     print the event log
  status                   print the firewall status
  help                     show this help
  quit                     leave the console";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Generate,
    SetMessage(String),
    SetCiphertext(String),
    SetPublicKey(String),
    SetPrivateKey(String),
    Encrypt,
    Decrypt,
    Copy(SessionField),
    Export(Option<PathBuf>),
    Show,
    Logs,
    Status,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandParseError {
    #[error("unknown command '{0}' (type 'help')")]
    Unknown(String),
    #[error("'{0}' expects an argument")]
    MissingArgument(&'static str),
    #[error("'{command}' takes no argument")]
    UnexpectedArgument { command: &'static str },
    #[error("unknown field '{0}'; expected public, private, message, encrypted or decrypted")]
    UnknownField(String),
}

impl ConsoleCommand {
    /// Parses one input line. Returns `Ok(None)` for blank lines. The whitespace between a
    /// command and its argument is dropped; text arguments otherwise keep their spacing.
    pub fn parse(line: &str) -> Result<Option<Self>, CommandParseError> {
        let line = line.trim_start();
        if line.trim().is_empty() {
            return Ok(None);
        }
        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim_start().trim_end_matches(['\r', '\n'])),
            None => (line.trim_end(), ""),
        };

        let command = match name {
            "generate" | "gen" => no_arg("generate", rest, Self::Generate)?,
            "message" | "msg" => Self::SetMessage(text_arg("message", rest)?),
            "ciphertext" => Self::SetCiphertext(text_arg("ciphertext", rest)?),
            "public-key" => Self::SetPublicKey(text_arg("public-key", rest)?),
            "private-key" => Self::SetPrivateKey(text_arg("private-key", rest)?),
            "encrypt" | "enc" => no_arg("encrypt", rest, Self::Encrypt)?,
            "decrypt" | "dec" => no_arg("decrypt", rest, Self::Decrypt)?,
            "copy" => Self::Copy(parse_field(rest.trim())?),
            "export" => {
                let dir = rest.trim();
                Self::Export((!dir.is_empty()).then(|| PathBuf::from(dir)))
            }
            "show" => no_arg("show", rest, Self::Show)?,
            "logs" => no_arg("logs", rest, Self::Logs)?,
            "status" => no_arg("status", rest, Self::Status)?,
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => return Err(CommandParseError::Unknown(other.to_string())),
        };
        Ok(Some(command))
    }
}

fn no_arg(
    command: &'static str,
    rest: &str,
    parsed: ConsoleCommand,
) -> Result<ConsoleCommand, CommandParseError> {
    if rest.trim().is_empty() {
        Ok(parsed)
    } else {
        Err(CommandParseError::UnexpectedArgument { command })
    }
}

fn text_arg(command: &'static str, rest: &str) -> Result<String, CommandParseError> {
    if rest.is_empty() {
        Err(CommandParseError::MissingArgument(command))
    } else {
        Ok(rest.to_string())
    }
}

fn parse_field(raw: &str) -> Result<SessionField, CommandParseError> {
    match raw {
        "" => Err(CommandParseError::MissingArgument("copy")),
        "public" | "public-key" => Ok(SessionField::PublicKey),
        "private" | "private-key" => Ok(SessionField::PrivateKey),
        "message" => Ok(SessionField::Message),
        "encrypted" | "ciphertext" => Ok(SessionField::Encrypted),
        "decrypted" => Ok(SessionField::Decrypted),
        other => Err(CommandParseError::UnknownField(other.to_string())),
    }
}
