use chrono::NaiveDateTime;

use crate::common::manager::slurm::parse_slurm_datetime;
use crate::common::parser::{NomResult, consume_all};
use crate::usage::interval::Interval;

pub fn check_parse_error<F: FnMut(&str) -> NomResult<O>, O>(
    parser: F,
    input: &str,
    expected_error: &str,
) {
    match consume_all(parser, input) {
        Err(e) => {
            let output = format!("{e:?}");
            assert_eq!(output, expected_error);
        }
        _ => panic!("The parser should have failed"),
    }
}

pub fn datetime(value: &str) -> NaiveDateTime {
    parse_slurm_datetime(value).unwrap()
}

pub fn interval(resource_id: &str, start: &str, end: &str) -> Interval {
    Interval::new(
        resource_id.to_string(),
        datetime(start),
        datetime(end),
        "alice".to_string(),
    )
}
