//! Append-only text output, one line per inspected listing.

use std::path::{Path, PathBuf};

use tokio::io::{AsyncWrite, AsyncWriteExt, BufWriter};

use crate::{inspect::Inspection, ItemDescriptor};

const LINE_END: &str = "\r\n";

/// `<Y> <M> <D> - <h> <m> <s> - <item>.txt`, unpadded local time.
pub fn file_name(item: &ItemDescriptor, started: &chrono::NaiveDateTime) -> String {
    format!(
        "{} - {}.txt",
        started.format("%Y %-m %-d - %-H %-M %-S"),
        item.file_label()
    )
}

pub fn format_price(price: Option<f64>, suffix: &str) -> String {
    match price {
        Some(p) => format!("{:.2}{}", p, suffix),
        None => String::new(),
    }
}

pub fn format_line(page: u64, pages: u64, inspection: &Inspection, suffix: &str) -> String {
    let listing_id = if inspection.item.m.is_empty() {
        inspection.listing_id.as_str()
    } else {
        inspection.item.m.as_str()
    };

    format!(
        "PAGE: [{}/{}] | LISTING_ID: {} | PRICE: {} | PATTERN: {} | FLOAT: {}",
        page,
        pages,
        listing_id,
        format_price(inspection.price, suffix),
        inspection.item.paintseed,
        inspection.item.floatvalue
    )
}

pub struct OutputSink<W> {
    writer: BufWriter<W>,
    lines: u64,
}

impl OutputSink<tokio::fs::File> {
    /// Creates `dir` if needed and opens the run's file in append mode.
    pub async fn create(
        dir: &Path,
        item: &ItemDescriptor,
        started: &chrono::NaiveDateTime,
    ) -> std::io::Result<(Self, PathBuf)> {
        tokio::fs::create_dir_all(dir).await?;

        let path = dir.join(file_name(item, started));
        let file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;

        Ok((Self::new(file), path))
    }
}

impl<W> OutputSink<W>
where
    W: AsyncWrite + Unpin,
{
    pub fn new(writer: W) -> Self {
        Self {
            writer: BufWriter::new(writer),
            lines: 0,
        }
    }

    /// Number of lines written so far.
    pub fn lines(&self) -> u64 {
        self.lines
    }

    async fn write_line(&mut self, line: &str) -> std::io::Result<()> {
        self.writer.write_all(line.as_bytes()).await?;
        self.writer.write_all(LINE_END.as_bytes()).await?;
        self.lines += 1;
        Ok(())
    }

    pub async fn write_inspection(
        &mut self,
        page: u64,
        pages: u64,
        inspection: &Inspection,
        suffix: &str,
    ) -> std::io::Result<()> {
        self.write_line(&format_line(page, pages, inspection, suffix))
            .await
    }

    pub async fn write_failed_page(&mut self, page: u64, pages: u64) -> std::io::Result<()> {
        self.write_line(&format!("PAGE: [{}/{}] | request failed", page, pages))
            .await
    }

    /// Flushes everything written and hands back the underlying writer.
    pub async fn close(mut self) -> std::io::Result<W> {
        self.writer.flush().await?;
        self.writer.shutdown().await?;
        Ok(self.writer.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{inspect::ItemInfo, Condition};

    fn inspection(m: &str, price: Option<f64>) -> Inspection {
        Inspection {
            listing_id: "4242".to_string(),
            item: ItemInfo {
                m: m.to_string(),
                floatvalue: 0.0612765327095985,
                paintseed: 661,
            },
            price,
        }
    }

    #[test]
    fn name_from_item_and_time() {
        let started = chrono::NaiveDate::from_ymd_opt(2024, 3, 7)
            .unwrap()
            .and_hms_opt(9, 5, 30)
            .unwrap();
        let item = ItemDescriptor {
            stattrak: true,
            app_id: 730,
            weapon: "AK-47".to_string(),
            finish: "Asiimov".to_string(),
            wear: Condition::FieldTested,
        };

        assert_eq!(
            "2024 3 7 - 9 5 30 - StatTrak™ AK-47 - Asiimov (Field-Tested).txt",
            file_name(&item, &started)
        );
    }

    #[test]
    fn price_two_decimals() {
        assert_eq!("2.00€", format_price(Some(174.0 / 87.0), "€"));
        assert_eq!("0.10€", format_price(Some(0.1), "€"));
        assert_eq!("", format_price(None, "€"));
    }

    #[test]
    fn line_layout() {
        assert_eq!(
            "PAGE: [1/2] | LISTING_ID: 5555 | PRICE: 2.00€ | PATTERN: 661 | FLOAT: 0.0612765327095985",
            format_line(1, 2, &inspection("5555", Some(2.0)), "€")
        );
        assert_eq!(
            "PAGE: [2/2] | LISTING_ID: 4242 | PRICE:  | PATTERN: 661 | FLOAT: 0.0612765327095985",
            format_line(2, 2, &inspection("", None), "€")
        );
    }

    #[tokio::test]
    async fn crlf_lines() {
        let mut sink = OutputSink::new(Vec::new());

        sink.write_inspection(1, 3, &inspection("1", None), "€")
            .await
            .unwrap();
        sink.write_failed_page(2, 3).await.unwrap();
        assert_eq!(2, sink.lines());

        let written = String::from_utf8(sink.close().await.unwrap()).unwrap();
        let lines: Vec<_> = written.split_terminator("\r\n").collect();

        assert_eq!(2, lines.len());
        assert!(lines[0].starts_with("PAGE: [1/3] | LISTING_ID: 1 |"));
        assert_eq!("PAGE: [2/3] | request failed", lines[1]);
        assert!(written.ends_with("\r\n"));
    }

    fn fresh_dir(name: &str) -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir()
            .join(format!("floatlog-{}-{}-{}", name, std::process::id(), nanos))
            .join("output")
    }

    #[tokio::test]
    async fn create_makes_dir_and_appends() {
        let dir = fresh_dir("create");
        assert!(!dir.exists());

        let started = chrono::NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(3, 4, 5)
            .unwrap();
        let item = ItemDescriptor::default();

        let (mut sink, path) = OutputSink::create(&dir, &item, &started).await.unwrap();
        assert!(dir.is_dir());
        assert!(path.ends_with(file_name(&item, &started)));

        sink.write_failed_page(1, 1).await.unwrap();
        sink.close().await.unwrap();

        // Same second, same file: the second run appends.
        let (mut sink, again) = OutputSink::create(&dir, &item, &started).await.unwrap();
        assert_eq!(path, again);
        sink.write_inspection(1, 1, &inspection("7", Some(1.5)), "€")
            .await
            .unwrap();
        sink.close().await.unwrap();

        let written = tokio::fs::read_to_string(&path).await.unwrap();
        assert_eq!(
            "PAGE: [1/1] | request failed\r\nPAGE: [1/1] | LISTING_ID: 7 | PRICE: 1.50€ | PATTERN: 661 | FLOAT: 0.0612765327095985\r\n",
            written
        );

        std::fs::remove_dir_all(dir.parent().unwrap()).ok();
    }
}
