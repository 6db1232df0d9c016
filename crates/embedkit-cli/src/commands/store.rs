use std::path::Path;

use anyhow::{Context as _, Result};

use embedkit_core::embed::EmbedDocument;
use embedkit_core::store::Identifier;

use super::{Context, read_input};
use crate::InputArgs;

pub async fn validate(ctx: &Context, input: InputArgs) -> Result<()> {
    let source = read_input(input).await?;
    let document = ctx.manager.converter().convert(source)?;
    println!("✓ valid embed ({})", summary(&document));
    Ok(())
}

pub async fn save(ctx: &Context, name: &str, input: InputArgs) -> Result<()> {
    let source = read_input(input).await?;
    let outcome = ctx
        .manager
        .save(&ctx.invoker, &ctx.partition, name, source)
        .await?;
    let verb = if outcome.is_created() { "Saved" } else { "Overwrote" };
    println!("{verb} `{}` in {}", Identifier::parse(name)?, ctx.partition);
    Ok(())
}

pub async fn get(ctx: &Context, name: &str) -> Result<()> {
    let record = ctx.manager.get(&ctx.invoker, &ctx.partition, name).await?;
    println!("{}", record.document.to_json_pretty()?);
    Ok(())
}

pub async fn list(ctx: &Context) -> Result<()> {
    let ids = ctx.manager.list(&ctx.invoker, &ctx.partition).await?;
    if ids.is_empty() {
        println!("No embeds saved in {}.", ctx.partition);
    }
    for id in ids {
        println!("{id}");
    }
    Ok(())
}

pub async fn delete(ctx: &Context, name: &str) -> Result<()> {
    let id = Identifier::parse(name)?;
    if ctx
        .manager
        .delete(&ctx.invoker, &ctx.partition, id.as_str())
        .await?
    {
        println!("Deleted `{id}`");
    } else {
        println!("Nothing saved under `{id}`");
    }
    Ok(())
}

pub async fn export(ctx: &Context, name: &str, out: &Path) -> Result<()> {
    let attachment = ctx
        .manager
        .download(&ctx.invoker, &ctx.partition, name)
        .await?;
    let path = out.join(&attachment.filename);
    tokio::fs::write(&path, &attachment.bytes)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("Wrote {}", path.display());
    Ok(())
}

fn summary(document: &EmbedDocument) -> String {
    let title = document.title().unwrap_or("untitled");
    format!(
        "\"{title}\", {} field(s), {} chars",
        document.fields().len(),
        document.total_chars()
    )
}
