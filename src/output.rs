use crate::config::CrawlMode;
use chrono::NaiveDate;
use serde::Serialize;
use std::{
	fs::{self, File},
	io::{BufWriter, Write},
	path::{Path, PathBuf},
};

pub fn output_file_name(mode: CrawlMode, date: NaiveDate) -> String {
	format!("{}_{}_crawl.json", date.format("%Y%m%d"), mode)
}

/// Writes `data` as one pretty-printed JSON array with 4-space indentation.
pub fn write_json<T: Serialize>(data: &[T], path: &Path) -> anyhow::Result<()> {
	let file = File::create(path)?;
	let mut writer = BufWriter::new(file);
	let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
	let mut serializer = serde_json::Serializer::with_formatter(&mut writer, formatter);
	data.serialize(&mut serializer)?;
	writer.flush()?;

	Ok(())
}

/// Saves one run's results to `<output_dir>/<mode>/<YYYYMMDD>_<mode>_crawl.json`.
pub fn write_results<T: Serialize>(
	data: &[T],
	output_dir: &Path,
	mode: CrawlMode,
	date: NaiveDate,
) -> anyhow::Result<PathBuf> {
	let dir = output_dir.join(mode.as_str());
	fs::create_dir_all(&dir)?;

	let path = dir.join(output_file_name(mode, date));
	write_json(data, &path)?;

	log::info!("Crawled {} data saved to '{}'.", mode, path.display());
	Ok(path)
}
