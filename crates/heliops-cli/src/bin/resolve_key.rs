use anyhow::Result;
use clap::Parser;

use heliops_storage::keys::resolve_object_key;

#[derive(Parser, Debug)]
#[command(name = "resolve_key")]
#[command(about = "Preview destination keys for file names without contacting storage")]
struct Args {
    /// Storage path prefix
    #[arg(long)]
    prefix: String,

    /// Original file names to resolve
    #[arg(required = true)]
    names: Vec<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    for name in &args.names {
        let key = resolve_object_key(&args.prefix, name)?;
        println!("{}  ->  {}", name, key);
    }

    Ok(())
}
