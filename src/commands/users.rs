// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use rusqlite::Connection;

use crate::store;
use crate::utils::{pretty_table, require_name};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = require_name(sub.get_one::<String>("name").unwrap())?;
            let email = sub.get_one::<String>("email").map(|s| s.as_str());
            let id = store::insert_user(conn, &name, email)?;
            if store::get_app_state(conn, "active_user")?.is_none() {
                store::set_app_state(conn, "active_user", &id.to_string())?;
                println!("Added user '{}' (active)", name);
            } else {
                println!("Added user '{}'", name);
            }
        }
        Some(("list", _)) => {
            let active = store::get_app_state(conn, "active_user")?
                .and_then(|v| v.parse::<i64>().ok());
            let mut data = Vec::new();
            for user in store::users(conn)? {
                let marker = if active == Some(user.id) { "*" } else { "" };
                data.push(vec![
                    user.name,
                    user.email.unwrap_or_default(),
                    marker.to_string(),
                ]);
            }
            println!("{}", pretty_table(&["Name", "Email", "Active"], data));
        }
        Some(("switch", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let user = store::user_by_name(conn, name)?
                .with_context(|| format!("User '{}' not found", name))?;
            store::set_app_state(conn, "active_user", &user.id.to_string())?;
            println!("Switched to user '{}'", user.name);
        }
        Some(("current", _)) => {
            let user = crate::utils::active_user(conn)?;
            println!(
                "{}{}",
                user.name,
                user.email.map(|e| format!(" <{}>", e)).unwrap_or_default()
            );
        }
        _ => {}
    }
    Ok(())
}
