use bmibot_model::measurement::MeasurementInput;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    pub id: String,
    pub display_name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Subcommand {
    Set(MeasurementInput),
    Show { user: Option<UserRef> },
    Announce,
}

/// A `/bmi` command as delivered by the chat platform.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawInvocation")]
pub struct CommandInvocation {
    pub guild_id: Option<String>,
    pub caller: UserRef,
    pub command: Subcommand,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum SubcommandName {
    Set,
    Show,
    Announce,
}

#[derive(Debug, Default, Deserialize)]
struct RawOptions {
    #[serde(flatten)]
    measurement: MeasurementInput,
    user: Option<UserRef>,
}

/// Wire shape of an invocation: flat, all options optional.
#[derive(Debug, Deserialize)]
struct RawInvocation {
    #[serde(default)]
    guild_id: Option<String>,
    caller: UserRef,
    subcommand: SubcommandName,
    #[serde(default)]
    options: RawOptions,
}

impl From<RawInvocation> for CommandInvocation {
    fn from(raw: RawInvocation) -> Self {
        let options = raw.options;
        let command = match raw.subcommand {
            SubcommandName::Set => Subcommand::Set(options.measurement),
            SubcommandName::Show => Subcommand::Show { user: options.user },
            SubcommandName::Announce => Subcommand::Announce,
        };
        Self {
            guild_id: raw.guild_id,
            caller: raw.caller,
            command,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    pub content: String,
    pub ephemeral: bool,
}

impl Reply {
    pub fn ephemeral(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ephemeral: true,
        }
    }

    pub fn public(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ephemeral: false,
        }
    }
}
