use colored::Colorize;
use std::path::Path;

pub fn handle(output: &Path) -> anyhow::Result<()> {
    ncp_sweep_config::write_template(output)?;

    println!("{}", "✓ Template written".green());
    println!("  {}", output.display().to_string().cyan());
    println!();
    println!("Fill in one row per root account, then run for example:");
    println!("  ncp-sweep -f {} list", output.display());
    Ok(())
}
