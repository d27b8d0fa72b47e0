// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! Layer/datatype selectors and their `LAYER/DATATYPE` text form

use std::fmt;
use std::str::FromStr;

use nom::{
    character::complete::{digit1, one_of, space0},
    combinator::{all_consuming, map_res},
    sequence::{delimited, separated_pair},
    IResult, Parser,
};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// GDS layer number and datatype (or texttype for labels)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LayerSpec {
    pub layer: i16,
    pub datatype: i16,
}

impl LayerSpec {
    pub const fn new(layer: i16, datatype: i16) -> Self {
        Self { layer, datatype }
    }

    /// Build a selector from unchecked numbers, rejecting values GDS cannot hold
    pub fn try_new(layer: i64, datatype: i64) -> Result<Self, ConfigError> {
        let check = |value: i64| {
            i16::try_from(value)
                .ok()
                .filter(|v| *v >= 0)
                .ok_or(ConfigError::LayerOutOfRange(value))
        };
        Ok(Self {
            layer: check(layer)?,
            datatype: check(datatype)?,
        })
    }
}

impl fmt::Display for LayerSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.layer, self.datatype)
    }
}

fn number(input: &str) -> IResult<&str, i64> {
    map_res(digit1, |digits: &str| digits.parse::<i64>()).parse(input)
}

/// `41/0`, `41:0` or `41,0`, with optional blanks around the separator
fn layer_pair(input: &str) -> IResult<&str, (i64, i64)> {
    delimited(
        space0,
        separated_pair(number, delimited(space0, one_of("/:,"), space0), number),
        space0,
    )
    .parse(input)
}

impl FromStr for LayerSpec {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (_, (layer, datatype)) = all_consuming(layer_pair)
            .parse(s)
            .map_err(|_| ConfigError::InvalidLayerSpec(s.to_string()))?;
        LayerSpec::try_new(layer, datatype)
    }
}
