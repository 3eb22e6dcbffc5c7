//! Writers for `aerodex export`.

use std::io::Write;

use aerodex_core::models::Airport;

use crate::config::ExportFormat;

const CSV_HEADER: &str = "id,icao_code,faa_code,name,facility_type,active,state,county,city,\
ownership,use_type,latitude,longitude,elevation,control_tower,effective_date,updated_at";

/// Writes `airports` to `out` in the requested format.
pub fn write_airports<W: Write>(
    out: &mut W,
    airports: &[Airport],
    format: ExportFormat,
) -> anyhow::Result<()> {
    match format {
        ExportFormat::Jsonl => write_jsonl(out, airports),
        ExportFormat::Json => write_json(out, airports),
        ExportFormat::Csv => write_csv(out, airports),
    }
}

/// One JSON object per line
fn write_jsonl<W: Write>(out: &mut W, airports: &[Airport]) -> anyhow::Result<()> {
    for airport in airports {
        serde_json::to_writer(&mut *out, airport)?;
        writeln!(out)?;
    }
    Ok(())
}

fn write_json<W: Write>(out: &mut W, airports: &[Airport]) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut *out, airports)?;
    writeln!(out)?;
    Ok(())
}

fn write_csv<W: Write>(out: &mut W, airports: &[Airport]) -> anyhow::Result<()> {
    writeln!(out, "{}", CSV_HEADER)?;

    for a in airports {
        writeln!(
            out,
            "{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{}",
            a.id,
            escape_csv(&a.icao_code),
            opt_text(&a.faa_code),
            opt_text(&a.name),
            a.facility_type.map(|t| t.as_str()).unwrap_or_default(),
            opt_display(&a.active),
            opt_text(&a.state),
            opt_text(&a.county),
            opt_text(&a.city),
            a.ownership.map(|o| o.as_str()).unwrap_or_default(),
            a.use_type.map(|u| u.as_str()).unwrap_or_default(),
            opt_text(&a.latitude),
            opt_text(&a.longitude),
            opt_display(&a.elevation),
            opt_display(&a.control_tower),
            a.effective_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            a.updated_at.format("%Y-%m-%dT%H:%M:%SZ"),
        )?;
    }
    Ok(())
}

fn opt_text(value: &Option<String>) -> String {
    value.as_deref().map(escape_csv).unwrap_or_default()
}

fn opt_display<T: ToString>(value: &Option<T>) -> String {
    value.as_ref().map(T::to_string).unwrap_or_default()
}

/// Escape a string for CSV output
pub fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
