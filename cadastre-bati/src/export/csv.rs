//! Export CSV des enregistrements parcelles

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use bati::ParcelRecord;

use crate::config::OutputConfig;

/// En-têtes de colonnes, dans l'ordre des champs de [`ParcelRecord`]
pub const HEADERS: [&str; 11] = [
    "section",
    "parcelle",
    "latitude",
    "longitude",
    "surface",
    "nb bati",
    "surface batie",
    "nb bati dur",
    "surface batie dur",
    "nb bati leger",
    "surface bati leger",
];

/// Écrit les enregistrements dans un fichier CSV
pub fn export_to_csv(records: &[ParcelRecord], config: &OutputConfig, output_path: &Path) -> Result<()> {
    let file = File::create(output_path)
        .context(format!("Failed to create file: {}", output_path.display()))?;
    let mut writer = BufWriter::new(file);

    write_csv(&mut writer, records, config)?;
    writer.flush()?;

    Ok(())
}

/// Écrit l'en-tête (si demandé) puis une ligne par parcelle
pub fn write_csv<W: Write>(writer: &mut W, records: &[ParcelRecord], config: &OutputConfig) -> Result<()> {
    if config.header {
        writeln!(writer, "{}", HEADERS.join(config.separator.as_str()))?;
    }

    for record in records {
        writeln!(writer, "{}", format_record(record, config))?;
    }

    Ok(())
}

/// Formate une ligne : 6 décimales pour les coordonnées, 1 pour les surfaces
///
/// Les champs texte sont écrits tels quels, sans guillemets : une section ou
/// un numéro contenant le séparateur décale les colonnes suivantes. Les
/// identifiants Etalab n'en contiennent pas.
pub fn format_record(record: &ParcelRecord, config: &OutputConfig) -> String {
    let decimal = |value: f64, places: usize| {
        let text = format!("{:.*}", places, value);
        if config.decimal_separator == "." {
            text
        } else {
            text.replace('.', &config.decimal_separator)
        }
    };

    let columns = [
        record.section.to_string(),
        record.numero.to_string(),
        decimal(record.latitude, 6),
        decimal(record.longitude, 6),
        record.surface.to_string(),
        record.built_count.to_string(),
        decimal(record.built_area, 1),
        record.hard_count.to_string(),
        decimal(record.hard_area, 1),
        record.light_count.to_string(),
        decimal(record.light_area, 1),
    ];

    columns.join(config.separator.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bati::Field;
    use std::io::Cursor;

    fn record() -> ParcelRecord {
        ParcelRecord {
            section: Field::Valid("AB".to_string()),
            numero: Field::Valid("0012".to_string()),
            latitude: 45.1885,
            longitude: 5.7245,
            surface: Field::Valid(1000),
            built_count: 2,
            built_area: 250.04,
            hard_count: 1,
            hard_area: 200.0,
            light_count: 1,
            light_area: 50.04,
        }
    }

    #[test]
    fn test_format_record() {
        let line = format_record(&record(), &OutputConfig::default());
        assert_eq!(
            line,
            "AB;0012;45.188500;5.724500;1000;2;250.0;1;200.0;1;50.0"
        );
    }

    #[test]
    fn test_format_with_decimal_comma() {
        let config = OutputConfig::from_preset("excel").unwrap();
        let line = format_record(&record(), &config);
        assert!(line.starts_with("AB;0012;45,188500;5,724500;1000;"));
        assert!(line.ends_with(";250,0;1;200,0;1;50,0"));
    }

    #[test]
    fn test_sentinel_in_output() {
        let mut r = record();
        r.surface = Field::Invalid;
        r.section = Field::Invalid;

        let line = format_record(&r, &OutputConfig::default());
        let columns: Vec<&str> = line.split(';').collect();
        assert_eq!(columns.len(), 11);
        assert_eq!(columns[0], "erreur");
        assert_eq!(columns[4], "erreur");
    }

    #[test]
    fn test_text_fields_written_unquoted() {
        let mut r = record();
        r.numero = Field::Valid("00;12".to_string());

        let line = format_record(&r, &OutputConfig::default());
        assert!(line.starts_with("AB;00;12;45.188500;"));
        assert_eq!(line.split(';').count(), 12);
    }

    #[test]
    fn test_write_csv_header() {
        let config = OutputConfig::from_preset("gdocs").unwrap();
        let mut buffer = Cursor::new(Vec::new());
        write_csv(&mut buffer, &[record()], &config).unwrap();

        let text = String::from_utf8(buffer.into_inner()).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "section\tparcelle\tlatitude\tlongitude\tsurface\tnb bati\tsurface batie\tnb bati dur\tsurface batie dur\tnb bati leger\tsurface bati leger"
        );
        assert!(lines.next().unwrap().starts_with("AB\t0012\t"));
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_export_to_csv() {
        let output_path = std::env::temp_dir().join("test_cadastre_bati.csv");
        let config = OutputConfig {
            header: false,
            ..Default::default()
        };

        export_to_csv(&[record(), record()], &config, &output_path).unwrap();

        let content = std::fs::read_to_string(&output_path).unwrap();
        assert_eq!(content.lines().count(), 2);

        std::fs::remove_file(output_path).ok();
    }
}
