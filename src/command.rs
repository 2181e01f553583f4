use teloxide::{prelude::Requester, utils::command::BotCommands, Bot};

use crate::error::HandlerResult;

#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(rename_rule = "lowercase", description = "Доступные команды:")]
pub enum Command {
    #[command(description = "начать заново и показать меню")]
    Start,
    #[command(description = "показать подсказку")]
    Help,
}

pub async fn setup_user_commands(bot: &Bot) -> HandlerResult<()> {
    bot.set_my_commands(Command::bot_commands()).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("/start", "yogabot").unwrap(), Command::Start);
        assert_eq!(Command::parse("/help", "yogabot").unwrap(), Command::Help);
        assert_eq!(Command::parse("/start@yogabot", "yogabot").unwrap(), Command::Start);
        assert!(Command::parse("/start@otherbot", "yogabot").is_err());
        assert!(Command::parse("/subscribe", "yogabot").is_err());
        assert!(Command::parse("start", "yogabot").is_err());
    }

    #[test]
    fn test_registered_commands() {
        let commands: Vec<String> = Command::bot_commands()
            .into_iter()
            .map(|c| c.command.trim_start_matches('/').to_string())
            .collect();
        assert_eq!(commands, vec!["start".to_string(), "help".to_string()]);
    }
}
