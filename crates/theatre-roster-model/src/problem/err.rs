// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use crate::common::{AnaesthetistId, StationId};
use theatre_roster_core::prelude::Day;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UnknownStationError {
    station: StationId,
    context: &'static str,
}

impl UnknownStationError {
    pub fn new(station: StationId, context: &'static str) -> Self {
        Self { station, context }
    }

    pub fn station(&self) -> StationId {
        self.station
    }

    pub fn context(&self) -> &'static str {
        self.context
    }
}

impl std::fmt::Display for UnknownStationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} references unknown station {}", self.context, self.station)
    }
}

impl std::error::Error for UnknownStationError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UnknownAnaesthetistError {
    anaesthetist: AnaesthetistId,
    context: &'static str,
}

impl UnknownAnaesthetistError {
    pub fn new(anaesthetist: AnaesthetistId, context: &'static str) -> Self {
        Self {
            anaesthetist,
            context,
        }
    }

    pub fn anaesthetist(&self) -> AnaesthetistId {
        self.anaesthetist
    }
}

impl std::fmt::Display for UnknownAnaesthetistError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} references unknown anaesthetist {}",
            self.context, self.anaesthetist
        )
    }
}

impl std::error::Error for UnknownAnaesthetistError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WeekendPairError {
    first: Day,
    second: Day,
}

impl WeekendPairError {
    pub fn new(first: Day, second: Day) -> Self {
        Self { first, second }
    }

    pub fn first(&self) -> Day {
        self.first
    }

    pub fn second(&self) -> Day {
        self.second
    }
}

impl std::fmt::Display for WeekendPairError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Invalid weekend pair ({}, {}): days must be ordered and flagged as weekend/holiday",
            self.first, self.second
        )
    }
}

impl std::error::Error for WeekendPairError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstanceError {
    UnknownStation(UnknownStationError),
    UnknownAnaesthetist(UnknownAnaesthetistError),
    WeekendPair(WeekendPairError),
}

impl std::fmt::Display for InstanceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InstanceError::UnknownStation(e) => write!(f, "{}", e),
            InstanceError::UnknownAnaesthetist(e) => write!(f, "{}", e),
            InstanceError::WeekendPair(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for InstanceError {}

impl From<UnknownStationError> for InstanceError {
    fn from(err: UnknownStationError) -> Self {
        InstanceError::UnknownStation(err)
    }
}

impl From<UnknownAnaesthetistError> for InstanceError {
    fn from(err: UnknownAnaesthetistError) -> Self {
        InstanceError::UnknownAnaesthetist(err)
    }
}

impl From<WeekendPairError> for InstanceError {
    fn from(err: WeekendPairError) -> Self {
        InstanceError::WeekendPair(err)
    }
}
