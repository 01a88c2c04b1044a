//! Interactive mode: one line = one navigation or one page action.

use anyhow::Result;
use backlog_console_core::models::SelfHealingAction;
use backlog_console_core::users::UserDraft;
use backlog_console_core::{PageAction, Shell};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::render;

pub const HELP: &str = "\
commands:
  open <path>                               navigate (see `routes`)
  show                                      print the current page
  routes                                    list the routes of this console
  refresh                                   reload the current page
  filter [term]                             filter logs (empty clears)
  ack <id> | resolve <id>                   alert transitions
  set <key> <value>                         edit a configuration field
  save                                      save settings locally
  update <parameter> <value>                send a setting to the backend
  heal <optimize_resources|restart_service|clear_cache>
  add-user <username> <email> <role> [status]
  edit-user <id> <username> <email> <role> [status]
  delete-user <id>
  help | quit";

#[derive(Debug, Clone, PartialEq)]
pub enum ReplCommand {
    Open(String),
    Show,
    Routes,
    Help,
    Quit,
    Action(PageAction),
}

fn draft(args: &[&str]) -> Option<UserDraft> {
    match args {
        [username, email, role] | [username, email, role, _] => Some(UserDraft {
            username: username.to_string(),
            email: email.to_string(),
            role: role.to_string(),
            status: args.get(3).unwrap_or(&"active").to_string(),
        }),
        _ => None,
    }
}

/// Reste brut de la ligne après les `skip` premiers mots (espaces internes conservés)
fn rest(line: &str, skip: usize) -> String {
    let mut tail = line.trim_start();
    for _ in 0..skip {
        tail = tail
            .split_once(char::is_whitespace)
            .map_or("", |(_, after)| after)
            .trim_start();
    }
    tail.trim_end().to_string()
}

pub fn parse(line: &str) -> Result<ReplCommand, String> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let Some((&verb, args)) = words.split_first() else {
        return Err("empty command".to_string());
    };
    let usage = || format!("usage: see `help` ({})", verb);

    let command = match (verb, args) {
        ("open", [path]) => ReplCommand::Open(path.to_string()),
        ("show", []) => ReplCommand::Show,
        ("routes", []) => ReplCommand::Routes,
        ("help", _) => ReplCommand::Help,
        ("quit" | "exit", _) => ReplCommand::Quit,
        ("refresh", []) => ReplCommand::Action(PageAction::Refresh),
        ("filter", _) => ReplCommand::Action(PageAction::Filter(rest(line, 1))),
        ("ack", [id]) => ReplCommand::Action(PageAction::Acknowledge(id.to_string())),
        ("resolve", [id]) => ReplCommand::Action(PageAction::Resolve(id.to_string())),
        ("set", [key, _, ..]) => ReplCommand::Action(PageAction::SetField {
            key: key.to_string(),
            value: rest(line, 2),
        }),
        ("save", []) => ReplCommand::Action(PageAction::SaveLocal),
        ("update", [parameter, _, ..]) => ReplCommand::Action(PageAction::UpdateConfig {
            parameter: parameter.to_string(),
            value: rest(line, 2),
        }),
        ("heal", [action]) => {
            let action = SelfHealingAction::parse(action).map_err(|e| e.to_string())?;
            ReplCommand::Action(PageAction::SelfHeal(action))
        }
        ("add-user", args) => ReplCommand::Action(PageAction::AddUser(draft(args).ok_or_else(usage)?)),
        ("edit-user", [id, fields @ ..]) => ReplCommand::Action(PageAction::EditUser {
            id: id.to_string(),
            draft: draft(fields).ok_or_else(usage)?,
        }),
        ("delete-user", [id]) => ReplCommand::Action(PageAction::DeleteUser(id.to_string())),
        (
            "open" | "show" | "routes" | "refresh" | "ack" | "resolve" | "set" | "save" | "update" | "heal"
            | "edit-user" | "delete-user",
            _,
        ) => return Err(usage()),
        (other, _) => return Err(format!("unknown command '{}', try `help`", other)),
    };
    Ok(command)
}

pub fn routes(shell: &Shell) -> String {
    shell
        .app()
        .routes()
        .into_iter()
        .map(|(path, page)| format!("  {:<20} {}", path, page.label()))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn screen(shell: &Shell) -> String {
    let mut out = render::header(shell.app(), &shell.header().status());
    out.push_str(&render::navigation(shell.app(), shell.current()));
    out.push_str("\n\n");
    match shell.view() {
        Some(view) => out.push_str(&render::view(&view)),
        None => out.push_str("(no page open)\n"),
    }
    out
}

pub async fn run(shell: &mut Shell) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    println!("{}", screen(shell));
    println!("type `help` for commands");

    loop {
        print!("{}> ", shell.current().map(|p| p.slug()).unwrap_or_default());
        std::io::Write::flush(&mut std::io::stdout())?;

        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(line) = line else { break };
        if line.trim().is_empty() {
            continue;
        }

        let command = match parse(&line) {
            Ok(command) => command,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };
        debug!("repl command {:?}", command);

        match command {
            ReplCommand::Quit => break,
            ReplCommand::Help => println!("{}", HELP),
            ReplCommand::Routes => println!("{}", routes(shell)),
            ReplCommand::Show => println!("{}", screen(shell)),
            ReplCommand::Open(path) => match shell.open(&path).await {
                Ok(_) => println!("{}", screen(shell)),
                Err(e) => println!("{}", e),
            },
            ReplCommand::Action(action) => match shell.dispatch(action).await {
                Ok(notice) => {
                    if let Some(notice) = notice {
                        println!("{}", render::notice(&notice));
                    }
                    println!("{}", screen(shell));
                }
                Err(e) => println!("{}", e),
            },
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_navigation() {
        assert_eq!(parse("open /logs"), Ok(ReplCommand::Open("/logs".into())));
        assert_eq!(parse("  quit "), Ok(ReplCommand::Quit));
        assert!(parse("open").is_err());
        assert!(parse("dance").unwrap_err().contains("unknown command"));
    }

    #[test]
    fn test_parse_actions_keep_rest_of_line() {
        assert_eq!(
            parse("filter service_3 error"),
            Ok(ReplCommand::Action(PageAction::Filter("service_3 error".into())))
        );
        assert_eq!(parse("filter"), Ok(ReplCommand::Action(PageAction::Filter(String::new()))));
        assert_eq!(
            parse("  filter disk  full "),
            Ok(ReplCommand::Action(PageAction::Filter("disk  full".into())))
        );
        assert_eq!(
            parse("set motd  two  spaces"),
            Ok(ReplCommand::Action(PageAction::SetField {
                key: "motd".into(),
                value: "two  spaces".into()
            }))
        );
        assert_eq!(
            parse("update logLevel DEBUG"),
            Ok(ReplCommand::Action(PageAction::UpdateConfig {
                parameter: "logLevel".into(),
                value: "DEBUG".into()
            }))
        );
        assert_eq!(
            parse("set dbConnection postgres://db host"),
            Ok(ReplCommand::Action(PageAction::SetField {
                key: "dbConnection".into(),
                value: "postgres://db host".into()
            }))
        );
    }

    #[test]
    fn test_parse_users_and_heal() {
        assert_eq!(
            parse("add-user carol carol@example.com admin"),
            Ok(ReplCommand::Action(PageAction::AddUser(UserDraft {
                username: "carol".into(),
                email: "carol@example.com".into(),
                role: "admin".into(),
                status: "active".into(),
            })))
        );
        assert!(matches!(
            parse("edit-user 2 bob bob@example.com user inactive"),
            Ok(ReplCommand::Action(PageAction::EditUser { ref id, ref draft })) if id == "2" && draft.status == "inactive"
        ));
        assert_eq!(
            parse("heal clear_cache"),
            Ok(ReplCommand::Action(PageAction::SelfHeal(SelfHealingAction::ClearCache)))
        );
        assert!(parse("heal reboot").is_err());
        assert!(parse("add-user carol").is_err());
    }
}
