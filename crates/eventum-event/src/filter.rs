//! Query-string filters for the event list

use chrono::{DateTime, NaiveDate};
use serde::Deserialize;

use crate::prelude::*;
use eventum_types::meta_adapter::ListEventOptions;

/// Raw `GET /events/` query parameters
#[derive(Debug, Default, Deserialize)]
pub struct EventFilterQuery {
	pub name: Option<String>,
	pub start_date: Option<String>,
	pub end_date: Option<String>,
}

/// Parses a filter date: either `YYYY-MM-DD` (midnight UTC) or RFC 3339
pub fn parse_filter_date(value: &str) -> Option<Timestamp> {
	let value = value.trim();
	if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
		return date.and_hms_opt(0, 0, 0).map(|dt| Timestamp(dt.and_utc().timestamp()));
	}
	Timestamp::from_iso(value)
}

/// Parses a lower bound. Sub-second precision rounds up to the next second,
/// so an event starting within the bound's second is excluded.
pub fn parse_filter_lower_bound(value: &str) -> Option<Timestamp> {
	let ts = parse_filter_date(value)?;
	let nanos = DateTime::parse_from_rfc3339(value.trim()).map_or(0, |dt| dt.timestamp_subsec_nanos());
	Some(if nanos > 0 { Timestamp(ts.0 + 1) } else { ts })
}

fn non_empty(value: Option<String>) -> Option<String> {
	value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn date_param(
	field: &str,
	value: Option<String>,
	parse: fn(&str) -> Option<Timestamp>,
) -> ClResult<Option<Timestamp>> {
	match non_empty(value) {
		None => Ok(None),
		Some(value) => parse(&value)
			.map(Some)
			.ok_or_else(|| Error::field(field, "Enter a valid date/time.")),
	}
}

impl EventFilterQuery {
	/// Converts the parameters into list options. Empty parameters are ignored.
	pub fn into_options(self) -> ClResult<ListEventOptions> {
		Ok(ListEventOptions {
			name: non_empty(self.name).map(Into::into),
			start_from: date_param("start_date", self.start_date, parse_filter_lower_bound)?,
			end_until: date_param("end_date", self.end_date, parse_filter_date)?,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use eventum_types::meta_adapter::Event;

	fn query(s: &str) -> EventFilterQuery {
		serde_urlencoded::from_str(s).unwrap()
	}

	#[test]
	fn test_parse_plain_date_is_midnight_utc() {
		assert_eq!(parse_filter_date("2023-01-01"), Some(Timestamp(1_672_531_200)));
	}

	#[test]
	fn test_parse_rfc3339() {
		assert_eq!(parse_filter_date("2023-01-01T12:00:00Z"), Some(Timestamp(1_672_574_400)));
		assert_eq!(parse_filter_date("2023-01-01T13:00:00+01:00"), Some(Timestamp(1_672_574_400)));
	}

	#[test]
	fn test_fractional_seconds() {
		// End bounds keep the whole second, start bounds move past it
		assert_eq!(parse_filter_date("2024-06-01T09:00:00.500Z"), Some(Timestamp(1_717_232_400)));
		assert_eq!(
			parse_filter_lower_bound("2024-06-01T09:00:00.500Z"),
			Some(Timestamp(1_717_232_401))
		);
		assert_eq!(parse_filter_lower_bound("2024-06-01T09:00:00Z"), Some(Timestamp(1_717_232_400)));
		assert_eq!(parse_filter_lower_bound("2024-06-01"), Some(Timestamp(1_717_200_000)));
		assert_eq!(parse_filter_lower_bound("garbage"), None);
	}

	#[test]
	fn test_fractional_start_date_excludes_event_in_that_second() {
		let opts = query("start_date=2024-06-01T09:00:00.500Z").into_options().unwrap();
		assert_eq!(opts.start_from, Some(Timestamp(1_717_232_401)));

		let event = Event {
			ev_id: EventId(1),
			name: "Tech Conference".into(),
			description: "Talks".into(),
			start_at: Timestamp(1_717_232_400),
			end_at: Timestamp(1_717_437_600),
			creator_id: UserId(1),
			creator_tag: "alice".into(),
			attendees: Vec::new(),
		};
		assert!(!opts.matches(&event));
	}

	#[test]
	fn test_parse_invalid_date() {
		assert_eq!(parse_filter_date("yesterday"), None);
		assert_eq!(parse_filter_date("2023-13-01"), None);
		assert_eq!(parse_filter_date("2023-02-30"), None);
	}

	#[test]
	fn test_no_params_means_no_restriction() {
		let opts = query("").into_options().unwrap();
		assert!(opts.name.is_none());
		assert!(opts.start_from.is_none());
		assert!(opts.end_until.is_none());
	}

	#[test]
	fn test_empty_params_are_ignored() {
		let opts = query("name=&start_date=&end_date=").into_options().unwrap();
		assert!(opts.name.is_none());
		assert!(opts.start_from.is_none());
		assert!(opts.end_until.is_none());
	}

	#[test]
	fn test_all_params() {
		let opts = query("name=Conf&start_date=2023-01-01&end_date=2023-12-31T23:59:59Z")
			.into_options()
			.unwrap();
		assert_eq!(opts.name.as_deref(), Some("Conf"));
		assert_eq!(opts.start_from, Some(Timestamp(1_672_531_200)));
		assert_eq!(opts.end_until, Some(Timestamp(1_704_067_199)));
	}

	#[test]
	fn test_malformed_date_names_the_parameter() {
		let res = query("end_date=soon").into_options();
		assert!(matches!(res, Err(Error::FieldError(ref field, _)) if field.as_ref() == "end_date"));
		let res = query("start_date=2023-99-99").into_options();
		assert!(matches!(res, Err(Error::FieldError(ref field, _)) if field.as_ref() == "start_date"));
	}
}

// vim: ts=4
