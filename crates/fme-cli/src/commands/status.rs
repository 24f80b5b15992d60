//! Status command: attach and report the attachment state.

use anyhow::Result;
use serde::Serialize;

#[derive(Serialize)]
struct StatusReport {
    status: &'static str,
    pid: i32,
    ram_start: String,
    aram_start: String,
    aram_accessible: bool,
    ram_total_size: u32,
}

/// Run the status command
pub fn run(json: bool) -> Result<()> {
    let accessor = super::attach();

    let report = StatusReport {
        status: accessor.status().as_str(),
        pid: accessor.pid(),
        ram_start: format!("{:#x}", accessor.ram_start()),
        aram_start: format!("{:#x}", accessor.aram_start()),
        aram_accessible: accessor.aram_accessible(),
        ram_total_size: accessor.ram_total_size(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Status:          {}", report.status);
        println!("PID:             {}", report.pid);
        println!("RAM start:       {}", report.ram_start);
        println!("ARAM start:      {}", report.aram_start);
        println!("ARAM accessible: {}", report.aram_accessible);
        println!("RAM size:        {} bytes", report.ram_total_size);
    }

    Ok(())
}
