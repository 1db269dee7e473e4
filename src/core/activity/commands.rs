// Chat commands understood by the activity dispatcher.

/// A parsed, platform-independent chat command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `event <@member>` - grant event points to someone.
    /// `target` is `None` when the argument was missing or not a mention.
    GrantEvent { target: Option<u64> },
    /// `points` - report the caller's own total.
    Points,
    /// `config <settingName> <value>`
    Config {
        setting: Option<String>,
        value: Option<String>,
    },
}

impl Command {
    pub fn grant_event(raw_target: Option<&str>) -> Self {
        Command::GrantEvent {
            target: raw_target.and_then(parse_member_mention),
        }
    }
}

/// Pull a member id out of a mention like `<@123>` or `<@!123>`.
/// A bare numeric id is accepted too.
pub fn parse_member_mention(raw: &str) -> Option<u64> {
    let digits: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, '<' | '>' | '@' | '!'))
        .collect();
    digits.parse().ok().filter(|id| *id != 0)
}
