//! Chip licenses, i.e. the Slurm license names of the individual chips (`W62F3`).
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use nom::bytes::complete::{tag, tag_no_case, take_while_m_n};
use nom::character::complete::{digit1, one_of};
use nom::combinator::{map, map_opt, map_res};
use nom::sequence::{preceded, terminated, tuple};
use serde::{Serialize, Serializer};

use crate::common::parser::{NomResult, consume_all};
use crate::common::utils::str::embedded_digits;

/// Wafer ids of chips that can be allocated through Slurm licenses.
const LICENSED_WAFERS: std::ops::RangeInclusive<u32> = 60..=75;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChipLicense {
    wafer: u32,
    fpga: u32,
}

impl ChipLicense {
    pub fn new(wafer: u32, fpga: u32) -> Self {
        Self { wafer, fpga }
    }

    pub fn wafer(&self) -> u32 {
        self.wafer
    }

    pub fn fpga(&self) -> u32 {
        self.fpga
    }

    /// Arguments selecting this chip for `srun`.
    pub fn srun_args(&self) -> String {
        format!("--wafer={} --fpga-without-aout={}", self.wafer, self.fpga)
    }
}

impl Display for ChipLicense {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "W{}F{}", self.wafer, self.fpga)
    }
}

impl Serialize for ChipLicense {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Plain decimal number, without sign or digit separators.
fn p_number(input: &str) -> NomResult<u32> {
    map_res(digit1, |digits: &str| digits.parse::<u32>())(input)
}

fn p_chip_license(input: &str) -> NomResult<ChipLicense> {
    map(
        tuple((
            preceded(one_of("Ww"), p_number),
            preceded(one_of("Ff"), p_number),
        )),
        |(wafer, fpga)| ChipLicense::new(wafer, fpga),
    )(input)
}

impl FromStr for ChipLicense {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        consume_all(p_chip_license, s.trim())
    }
}

fn p_licensed_wafer(input: &str) -> NomResult<u32> {
    map_res(
        take_while_m_n(2, 2, |c: char| c.is_ascii_digit()),
        |digits: &str| -> anyhow::Result<u32> {
            let wafer = digits.parse::<u32>()?;
            if LICENSED_WAFERS.contains(&wafer) {
                Ok(wafer)
            } else {
                Err(anyhow::anyhow!("wafer {wafer} cannot be licensed"))
            }
        },
    )(input)
}

fn p_licensed_fpga(input: &str) -> NomResult<u32> {
    map_opt(one_of("0123"), |c: char| c.to_digit(10))(input)
}

/// Parses one allocated chip from a Slurm TRES item, e.g. `license/w62f3=1`.
fn p_allocated_license(input: &str) -> NomResult<ChipLicense> {
    map(
        terminated(
            tuple((
                preceded(tag_no_case("license/w"), p_licensed_wafer),
                preceded(tag_no_case("f"), p_licensed_fpga),
            )),
            tag("=1"),
        ),
        |(wafer, fpga)| ChipLicense::new(wafer, fpga),
    )(input)
}

fn find_allocated_license(item: &str) -> Option<ChipLicense> {
    item.char_indices()
        .filter(|(_, c)| c.eq_ignore_ascii_case(&'l'))
        .find_map(|(index, _)| p_allocated_license(&item[index..]).ok())
        .map(|(_, license)| license)
}

/// Returns all chips allocated by a job, given its allocated TRES string
/// (e.g. `billing=1,cpu=2,license/w62f3=1,license/w63f0=1,node=1`).
/// Each comma-separated item contributes at most one chip.
pub fn parse_allocated_licenses(alloc_tres: &str) -> Vec<ChipLicense> {
    alloc_tres
        .split(',')
        .filter_map(find_allocated_license)
        .collect()
}

/// Sort key of a resource, made of all digits contained in its id (`W72F1` => 721).
/// Ids without digits yield zero.
pub fn numeric_key(resource_id: &str) -> u64 {
    embedded_digits(resource_id)
        .bytes()
        .fold(0u64, |key, digit| {
            key.saturating_mul(10).saturating_add((digit - b'0') as u64)
        })
}
