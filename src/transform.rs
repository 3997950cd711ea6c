//! Turns one page of results into what the screen shows: table rows,
//! per-address bandwidth series and the chart ticks.
//!
//! Everything here is rebuilt from scratch for every page. Addresses seen on
//! an earlier page do not keep their series index.

use std::collections::HashMap;

use chrono::{Local, TimeZone};

use crate::format;
use crate::model::{Page, Record, Window};

pub const TITLES: [&str; 8] = [
    "Timestamp",
    "Internal Addr.",
    "Real Addr.",
    "Remote Addr.",
    "Connect Time",
    "Latency",
    "Download Speed",
    "Upload Speed",
];

#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    /// Absolute index of the record in the result set.
    pub index: u64,
    /// Rendered cells in column order. Empty values have no cell, so a row
    /// may be shorter than `TITLES` and its later cells shift left.
    pub cells: Vec<String>,
}

impl TableRow {
    pub fn is_odd(&self) -> bool {
        self.index % 2 == 1
    }
}

/// Bandwidth points for one real address, oldest first.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub address: String,
    /// `(timestamp secs, Mbit/s)`
    pub download: Vec<(f64, f64)>,
    pub upload: Vec<(f64, f64)>,
}

impl Series {
    fn new(address: &str) -> Self {
        Self {
            address: address.to_string(),
            download: Vec::new(),
            upload: Vec::new(),
        }
    }

    pub fn download_label(&self) -> String {
        format!("DOWN {}", self.address)
    }

    pub fn upload_label(&self) -> String {
        format!("UP {}", self.address)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageView {
    pub window: Window,
    pub rows: Vec<TableRow>,
    /// Indexed by first appearance of the address on the page.
    pub series: Vec<Series>,
    /// `(offset within page, label)`, last record first.
    pub ticks: Vec<(usize, String)>,
    pub returned_upper: u64,
}

impl PageView {
    pub fn empty(window: Window) -> Self {
        Self {
            window,
            rows: Vec::new(),
            series: Vec::new(),
            ticks: Vec::new(),
            returned_upper: window.start,
        }
    }

    /// Chart datasets in plotting order: every download series, then every
    /// upload series.
    pub fn datasets(&self) -> Vec<(String, &[(f64, f64)])> {
        let downloads = self
            .series
            .iter()
            .map(|s| (s.download_label(), s.download.as_slice()));
        let uploads = self
            .series
            .iter()
            .map(|s| (s.upload_label(), s.upload.as_slice()));
        downloads.chain(uploads).collect()
    }
}

pub fn transform(page: &Page) -> PageView {
    transform_in(page, &Local)
}

pub fn transform_in<Tz: TimeZone>(page: &Page, tz: &Tz) -> PageView
where
    Tz::Offset: std::fmt::Display,
{
    let mut view = PageView::empty(page.window);
    let mut series_index: HashMap<&str, usize> = HashMap::new();

    for (offset, record) in page.records.iter().enumerate() {
        let index = page.window.start + offset as u64;
        let when = format::timestamp_in(record.timestamp_secs(), tz);

        let slot = *series_index
            .entry(record.real_address.as_str())
            .or_insert_with(|| {
                view.series.push(Series::new(&record.real_address));
                view.series.len() - 1
            });
        let at = record.timestamp_secs();
        view.series[slot]
            .download
            .push((at, format::mbits(record.download_bps())));
        view.series[slot]
            .upload
            .push((at, format::mbits(record.upload_bps())));

        view.ticks.push((offset, when.clone()));
        view.rows.push(TableRow {
            index,
            cells: cells(record, when),
        });
    }

    // Pages arrive newest first; the chart wants time to run forward.
    for series in &mut view.series {
        series.download.reverse();
        series.upload.reverse();
    }
    view.ticks.reverse();
    view.returned_upper = page.returned_upper();
    view
}

fn cells(record: &Record, when: String) -> Vec<String> {
    [
        when,
        record.internal_address.clone(),
        record.real_address.clone(),
        record.remote_address.clone(),
        format::millis_text(record.connect_time_secs()),
        format::millis_text(record.latency_secs()),
        format::rate_text(record.download_bps()),
        format::rate_text(record.upload_bps()),
    ]
    .into_iter()
    .filter(|cell| !cell.is_empty())
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record(ts: u64, real: &str, down: f64, up: f64) -> Record {
        Record {
            timestamp: ts.to_string(),
            internal_address: "192.168.0.10".into(),
            real_address: real.into(),
            remote_address: "130.192.91.231".into(),
            connect_time: "0.0213".into(),
            latency: "0.0199".into(),
            download_speed: down.to_string(),
            upload_speed: up.to_string(),
        }
    }

    // Ten samples an hour apart, newest first, alternating between two hosts.
    fn interleaved(start: u64) -> Page {
        let records = (0..10u64)
            .map(|i| {
                let real = if i % 2 == 0 { "1.2.3.4" } else { "5.6.7.8" };
                record(1_290_036_000 - i * 3600, real, 1_250_000.0 + i as f64, 62_500.0)
            })
            .collect();
        Page {
            window: Window::new(start, start + 10),
            records,
        }
    }

    #[test]
    fn two_addresses_make_two_series_pairs() {
        let view = transform_in(&interleaved(0), &Utc);
        assert_eq!(view.series.len(), 2);
        assert_eq!(view.datasets().len(), 4);
        assert_eq!(view.rows.len(), 10);
        for row in &view.rows {
            assert_eq!(row.cells.len(), TITLES.len());
        }
    }

    #[test]
    fn series_index_follows_first_appearance() {
        let page = Page {
            window: Window::new(0, 10),
            records: vec![
                record(300, "9.9.9.9", 0.0, 0.0),
                record(200, "1.1.1.1", 0.0, 0.0),
                record(100, "9.9.9.9", 0.0, 0.0),
                record(50, "4.4.4.4", 0.0, 0.0),
            ],
        };
        let view = transform_in(&page, &Utc);
        let order: Vec<&str> = view.series.iter().map(|s| s.address.as_str()).collect();
        assert_eq!(order, ["9.9.9.9", "1.1.1.1", "4.4.4.4"]);
        assert_eq!(view.series[0].download.len(), 2);
    }

    #[test]
    fn series_points_run_oldest_first() {
        let view = transform_in(&interleaved(0), &Utc);
        for series in &view.series {
            assert!(series.download.windows(2).all(|w| w[0].0 < w[1].0));
            assert!(series.upload.windows(2).all(|w| w[0].0 < w[1].0));
        }
    }

    #[test]
    fn points_carry_rounded_rates() {
        let page = Page {
            window: Window::new(0, 1),
            records: vec![record(100, "1.2.3.4", 123_456.0, 62_500.0)],
        };
        let view = transform_in(&page, &Utc);
        assert_eq!(view.series[0].download, vec![(100.0, 0.988)]);
        assert_eq!(view.series[0].upload, vec![(100.0, 0.5)]);
    }

    #[test]
    fn row_keeps_field_order() {
        let page = Page {
            window: Window::new(0, 1),
            records: vec![record(1_290_004_823, "1.2.3.4", 1_250_000.0, 62_500.0)],
        };
        let view = transform_in(&page, &Utc);
        assert_eq!(
            view.rows[0].cells,
            vec![
                "2010-11-17\n14:40",
                "192.168.0.10",
                "1.2.3.4",
                "130.192.91.231",
                "21 ms",
                "20 ms",
                "10.000 Mbit/s",
                "0.500 Mbit/s",
            ]
        );
    }

    #[test]
    fn empty_address_drops_its_cell() {
        let mut sample = record(100, "1.2.3.4", 0.0, 0.0);
        sample.internal_address.clear();
        let page = Page {
            window: Window::new(0, 1),
            records: vec![sample],
        };
        let view = transform_in(&page, &Utc);
        assert_eq!(view.rows[0].cells.len(), TITLES.len() - 1);
        assert_eq!(view.rows[0].cells[1], "1.2.3.4");
    }

    #[test]
    fn blank_numbers_still_render() {
        let page = Page {
            window: Window::new(0, 1),
            records: vec![Record {
                real_address: "1.2.3.4".into(),
                ..Default::default()
            }],
        };
        let view = transform_in(&page, &Utc);
        assert_eq!(
            view.rows[0].cells,
            vec![
                "1970-01-01\n00:00",
                "1.2.3.4",
                "0 ms",
                "0 ms",
                "0.000 Mbit/s",
                "0.000 Mbit/s",
            ]
        );
    }

    #[test]
    fn ticks_list_last_record_first() {
        let view = transform_in(&interleaved(30), &Utc);
        let offsets: Vec<usize> = view.ticks.iter().map(|(o, _)| *o).collect();
        assert_eq!(offsets, (0..10).rev().collect::<Vec<_>>());
        assert_eq!(view.ticks[9].1, view.rows[0].cells[0]);
    }

    #[test]
    fn rows_carry_absolute_index() {
        let view = transform_in(&interleaved(30), &Utc);
        assert_eq!(view.rows[0].index, 30);
        assert!(!view.rows[0].is_odd());
        assert!(view.rows[1].is_odd());
        assert_eq!(view.returned_upper, 40);
    }

    #[test]
    fn empty_page() {
        let page = Page {
            window: Window::new(20, 30),
            records: Vec::new(),
        };
        let view = transform_in(&page, &Utc);
        assert!(view.rows.is_empty());
        assert!(view.series.is_empty());
        assert!(view.ticks.is_empty());
        assert_eq!(view.returned_upper, 20);
    }
}
