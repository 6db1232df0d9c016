use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};

use embedkit_application::{ChannelId, OpenedPaginator};
use embedkit_core::pager::{Control, NavigationEvent};

use super::terminal::parse_control;
use super::{Context, require_named_input};
use crate::InputArgs;

const TERMINAL: &str = "terminal";

pub async fn show(ctx: &Context) -> Result<()> {
    let opened = ctx
        .manager
        .show(&ctx.invoker, &ctx.partition, &ChannelId::new(TERMINAL))
        .await?;
    drive(ctx, opened).await
}

pub async fn source(ctx: &Context, input: InputArgs) -> Result<()> {
    let source = require_named_input(input).await?;
    let opened = ctx
        .manager
        .source(&ctx.invoker, &ChannelId::new(TERMINAL), source)
        .await?;
    drive(ctx, opened).await
}

/// Feeds typed controls into the paginator until it closes.
async fn drive(ctx: &Context, opened: OpenedPaginator) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut task = opened.task;

    loop {
        tokio::select! {
            _ = &mut task => break,
            line = lines.next_line() => {
                let control = match line? {
                    Some(line) => match parse_control(&line) {
                        Some(control) => control,
                        None => {
                            eprintln!("Unknown control `{}`", line.trim());
                            continue;
                        }
                    },
                    None => {
                        let event = NavigationEvent::new(
                            opened.session_id.clone(),
                            ctx.invoker.actor.clone(),
                            Control::Close,
                        );
                        let _ = ctx.manager.dispatch(event).await;
                        let _ = (&mut task).await;
                        break;
                    }
                };
                let event = NavigationEvent::new(
                    opened.session_id.clone(),
                    ctx.invoker.actor.clone(),
                    control,
                );
                if let Err(e) = ctx.manager.dispatch(event).await {
                    if !e.is_silent() {
                        eprintln!("{e}");
                    }
                }
            }
        }
    }

    Ok(())
}
