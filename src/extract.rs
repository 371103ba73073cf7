use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

/// Reads one numeric metric out of a parsed page. Anything that cannot be
/// found or parsed is reported as 0.
pub trait MetricExtractor {
	fn extract(&self, document: &Html, key: &str) -> u64;
}

static CELL_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("td").unwrap());
static LINK_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a").unwrap());
static SPAN_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("span").unwrap());

// Button, link, generic container, in that priority order
static TAG_SELECTORS: Lazy<[(&str, Selector); 3]> = Lazy::new(|| {
	[
		("button", Selector::parse("button").unwrap()),
		("a", Selector::parse("a").unwrap()),
		("div", Selector::parse("div").unwrap()),
	]
});

static COUNT_RE: Lazy<Regex> =
	Lazy::new(|| Regex::new(r"^(\d[\d.,]*)\s*(?:([KkMm])\b)?").unwrap());

const UNIT_SUFFIX: &str = "\u{a0}Einwohner";

fn element_text(element: ElementRef) -> String {
	element.text().collect::<String>().trim().to_string()
}

fn rendered_text(element: ElementRef) -> String {
	element
		.text()
		.flat_map(str::split_whitespace)
		.collect::<Vec<_>>()
		.join(" ")
}

// Tabular Extractor (encyclopedia infobox rows)
pub struct TableExtractor;

fn is_cell_match(cell: ElementRef, key: &str) -> bool {
	let key = key.trim();
	let bare_key = key.strip_suffix(':').unwrap_or(key);
	let matches = |text: &str| text == key || text == bare_key;

	matches(&element_text(cell))
		|| cell
			.select(&LINK_SELECTOR)
			.any(|link| matches(&element_text(link)))
}

fn next_cell(cell: ElementRef) -> Option<ElementRef> {
	cell.next_siblings()
		.filter_map(ElementRef::wrap)
		.find(|sibling| sibling.value().name() == "td")
}

pub fn parse_table_value(text: &str) -> u64 {
	let token = text.trim().split(' ').next().unwrap_or_default();
	let token = token.trim_end_matches(UNIT_SUFFIX);
	let token = token
		.split(|c: char| c.is_whitespace() || c == ',')
		.next()
		.unwrap_or_default();

	token.replace('.', "").parse().unwrap_or(0)
}

#[test]
fn test_parse_table_value() {
	const TEST_STRINGS: [(&str, u64); 9] = [
		("123.456 Einwohner", 123456),
		("123.456\u{a0}Einwohner", 123456),
		("  61.130 (31. Dez. 2022)", 61130),
		("1.234,5 Einw./km²", 1234),
		("789\u{a0}Einw. je km²", 789),
		("2022", 2022),
		("", 0),
		("unbekannt", 0),
		("ca. 500", 0),
	];

	for (input, expected) in TEST_STRINGS {
		let result = parse_table_value(input);
		assert_eq!(
			result, expected,
			"Expected '{}' for input '{}', but got '{}'",
			expected, input, result
		);
	}
}

impl MetricExtractor for TableExtractor {
	fn extract(&self, document: &Html, key: &str) -> u64 {
		let Some(cell) = document
			.select(&CELL_SELECTOR)
			.find(|cell| is_cell_match(*cell, key))
		else {
			log::debug!("No table cell found for key '{}'", key);
			return 0;
		};

		match next_cell(cell) {
			Some(value_cell) => {
				let text = element_text(value_cell);
				let value = parse_table_value(&text);
				log::debug!("Extracted '{}' -> '{}' -> {}", key, text, value);
				value
			}
			None => {
				log::debug!("Table cell for key '{}' has no value cell", key);
				0
			}
		}
	}
}

// Heuristic Extractor (social media profile counters)
pub struct ButtonExtractor;

fn is_key_match(element: ElementRef, key: &str) -> bool {
	let key = key.trim().to_lowercase();
	!key.is_empty() && rendered_text(element).to_lowercase().contains(&key)
}

/// Innermost text of the counter, two span levels down when the markup has
/// them.
fn counter_text(element: ElementRef) -> Option<String> {
	let span = element.select(&SPAN_SELECTOR).next()?;
	let inner = span.select(&SPAN_SELECTOR).next().unwrap_or(span);
	Some(element_text(inner))
}

/// Parses a displayed count. A trailing `K`/`M` scales the mantissa, whose
/// `.` is then a decimal point; otherwise `,` and `.` are thousands
/// separators.
pub fn parse_count(text: &str) -> u64 {
	let Some(caps) = COUNT_RE.captures(text.trim()) else {
		return 0;
	};
	let number = &caps[1];

	let (multiplier, scale_digits) = match caps.get(2).map(|m| m.as_str()) {
		Some("K" | "k") => (1_000u64, 3),
		Some("M" | "m") => (1_000_000u64, 6),
		_ => return number.replace([',', '.'], "").parse().unwrap_or(0),
	};

	// "12,5K" uses a decimal comma; "1,234.5K" groups thousands.
	let number = if number.matches(',').count() == 1 && !number.contains('.') {
		number.replace(',', ".")
	} else {
		number.replace(',', "")
	};
	let (whole, fraction) = number.split_once('.').unwrap_or((number.as_str(), ""));
	let Ok(whole) = whole.parse::<u64>() else {
		return 0;
	};

	let fraction: String = fraction
		.chars()
		.filter(char::is_ascii_digit)
		.take(scale_digits)
		.collect();
	let fraction = match fraction.parse::<u64>() {
		Ok(value) => value * 10u64.pow((scale_digits - fraction.len()) as u32),
		Err(_) => 0,
	};

	whole
		.checked_mul(multiplier)
		.and_then(|value| value.checked_add(fraction))
		.unwrap_or(0)
}

#[test]
fn test_parse_count() {
	const TEST_STRINGS: [(&str, u64); 15] = [
		("1.2M", 1200000),
		("12,5K", 12500),
		("1,2M", 1200000),
		("1,2 M", 1200000),
		("6,900", 6900),
		("6.900", 6900),
		("12.5K", 12500),
		("3k", 3000),
		("1,234.56M", 1234560000),
		("2M followers", 2000000),
		("815 posts", 815),
		("900 members", 900),
		("0", 0),
		("", 0),
		("followers", 0),
	];

	for (input, expected) in TEST_STRINGS {
		let result = parse_count(input);
		assert_eq!(
			result, expected,
			"Expected '{}' for input '{}', but got '{}'",
			expected, input, result
		);
	}
}

impl ButtonExtractor {
	fn extract_from_tag(&self, document: &Html, tag: &str, selector: &Selector, key: &str) -> u64 {
		log::debug!("Trying to find element with key '{}' in '{}' tags", key, tag);

		document
			.select(selector)
			.find(|element| is_key_match(*element, key))
			.and_then(counter_text)
			.map(|text| {
				let value = parse_count(&text);
				log::debug!("Extracted value '{}' -> {}", text, value);
				value
			})
			.unwrap_or(0)
	}
}

impl MetricExtractor for ButtonExtractor {
	fn extract(&self, document: &Html, key: &str) -> u64 {
		for (tag, selector) in TAG_SELECTORS.iter() {
			let value = self.extract_from_tag(document, tag, selector, key);
			if value > 0 {
				log::debug!(
					"Found element with key '{}' in '{}' tag - value: {}",
					key,
					tag,
					value
				);
				return value;
			}
		}

		log::debug!("Failed to find element with key '{}'", key);
		0
	}
}
