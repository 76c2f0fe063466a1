use crate::domain::payment::PaymentRecord;
use crate::error::Result;
use clap::ValueEnum;
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

/// Writes ledger records to any `Write` sink (e.g. Stdout, File).
pub struct PaymentWriter<W: Write> {
    sink: W,
}

impl<W: Write> PaymentWriter<W> {
    pub fn new(sink: W) -> Self {
        Self { sink }
    }

    pub fn write(&mut self, format: ExportFormat, payments: &[PaymentRecord]) -> Result<()> {
        match format {
            ExportFormat::Csv => self.write_csv(payments),
            ExportFormat::Json => self.write_json(payments),
        }
    }

    /// Writes a `id,username,amount,method` header followed by one row per
    /// record. The header is written even when there are no records.
    pub fn write_csv(&mut self, payments: &[PaymentRecord]) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(&mut self.sink);
        writer.write_record(["id", "username", "amount", "method"])?;
        for payment in payments {
            writer.serialize(payment)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Writes the records as a pretty-printed JSON array.
    pub fn write_json(&mut self, payments: &[PaymentRecord]) -> Result<()> {
        serde_json::to_writer_pretty(&mut self.sink, payments)?;
        writeln!(self.sink)?;
        Ok(())
    }
}
