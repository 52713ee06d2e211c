//! Stats command handler.
//!
//! Prints aggregate statistics over every loaded record.

use cesantias_agent::format::{format_currency, group_thousands};
use cesantias_agent::SeveranceAgent;
use cesantias_core::{AppError, AppResult};
use clap::Args;

/// Show aggregate statistics over the records
#[derive(Args, Debug)]
pub struct StatsCommand {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl StatsCommand {
    pub async fn execute(&self, agent: &SeveranceAgent) -> AppResult<()> {
        tracing::info!("Executing stats command");

        let stats = agent.get_stats().await?;

        if self.json {
            let json = serde_json::to_string_pretty(&stats)
                .map_err(|e| AppError::Serialization(e.to_string()))?;
            println!("{}", json);
            return Ok(());
        }

        println!("Empleados:          {}", group_thousands(stats.total_employees as u64));
        println!("Causadas:           {}", group_thousands(stats.accrued_employees as u64));
        println!("Monto total:        {}", format_currency(stats.total_amount));
        println!("Promedio:           {}", format_currency(stats.average_amount));
        println!("Periodo:            {}", stats.month_range);

        Ok(())
    }
}
