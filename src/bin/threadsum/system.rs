use anyhow::Result;
use std::fs;
use threadsum::input::Bundled;

pub fn handle_template() -> Result<()> {
    if let Some(template) = Bundled::get(".env.template") {
        fs::write(".env.template", template.data)?;
        println!("wrote .env.template");
    }
    Ok(())
}

pub async fn handle_serve() -> Result<()> {
    threadsum::server::start().await
}
