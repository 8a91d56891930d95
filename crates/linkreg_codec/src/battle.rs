//! Battle-history blocks.
//!
//! ```text
//! BATTLE:Battle of Yavin
//! DATE:19770525
//! FLEET:Red Squadron|X|12|Ready for Jump, Shield Active
//! FLEET:Gold Squadron|Y|4|Critical Damage
//! ```
//!
//! A `BATTLE:` line opens a block. Exactly one `DATE:` must follow before
//! any `FLEET:` line. Blocks are returned in file order; merging blocks that
//! repeat a name and date is left to the caller.

use crate::error::{CodecError, CodecResult};
use crate::lines::{is_valid_text_field, logical_lines, parse_field};
use std::fmt;

/// Prefix of a battle header line.
pub const BATTLE_PREFIX: &str = "BATTLE:";
/// Prefix of a battle date line.
pub const DATE_PREFIX: &str = "DATE:";
/// Prefix of a fleet line.
pub const FLEET_PREFIX: &str = "FLEET:";
/// Separator between fleet fields.
pub const FLEET_SEPARATOR: char = '|';

/// Checks that `field` can be written as one field of a fleet line and read
/// back unchanged.
pub fn is_valid_fleet_field(field: &str) -> bool {
    is_valid_text_field(field) && !field.contains(FLEET_SEPARATOR)
}

/// A fleet line: `<name>|<reserved>|<total_ships>|<status-text>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FleetLine {
    /// Fleet name.
    pub name: String,
    /// Reserved column, carried through unchanged.
    pub reserved: String,
    /// Number of ships in the fleet.
    pub total_ships: u16,
    /// Free-form status text scanned for keywords.
    pub status_text: String,
}

impl FleetLine {
    /// Creates a fleet line.
    pub fn new(
        name: impl Into<String>,
        reserved: impl Into<String>,
        total_ships: u16,
        status_text: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            reserved: reserved.into(),
            total_ships,
            status_text: status_text.into(),
        }
    }

    /// Decodes the part of a fleet line after `FLEET:`.
    ///
    /// # Errors
    ///
    /// Returns an error unless there are exactly four fields, a non-empty
    /// name and a `u16` ship count.
    pub fn decode(body: &str) -> CodecResult<Self> {
        let mut fields = body.split(FLEET_SEPARATOR).map(str::trim);
        let name = fields
            .next()
            .filter(|name| !name.is_empty())
            .ok_or(CodecError::EmptyField { field: "fleet_name" })?;
        let reserved = fields
            .next()
            .ok_or(CodecError::MissingField { field: "reserved" })?;
        let total_ships = parse_field(fields.next(), "total_ships")?;
        let status_text = fields
            .next()
            .ok_or(CodecError::MissingField { field: "status" })?;
        if let Some(extra) = fields.next() {
            return Err(CodecError::unexpected_field(extra));
        }
        Ok(Self::new(name, reserved, total_ships, status_text))
    }
}

impl fmt::Display for FleetLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{FLEET_PREFIX}{}{FLEET_SEPARATOR}{}{FLEET_SEPARATOR}{}{FLEET_SEPARATOR}{}",
            self.name, self.reserved, self.total_ships, self.status_text
        )
    }
}

/// A single line of a battle-history file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// `BATTLE:<name>`
    Battle(String),
    /// `DATE:<u32>`
    Date(u32),
    /// `FLEET:...`
    Fleet(FleetLine),
}

impl Directive {
    /// Decodes one logical line.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown prefixes or malformed payloads.
    pub fn decode(line: &str) -> CodecResult<Self> {
        if let Some(name) = line.strip_prefix(BATTLE_PREFIX) {
            let name = name.trim();
            if name.is_empty() {
                return Err(CodecError::EmptyField {
                    field: "battle_name",
                });
            }
            Ok(Self::Battle(name.to_string()))
        } else if let Some(date) = line.strip_prefix(DATE_PREFIX) {
            parse_field(Some(date.trim()), "date").map(Self::Date)
        } else if let Some(body) = line.strip_prefix(FLEET_PREFIX) {
            FleetLine::decode(body).map(Self::Fleet)
        } else {
            Err(CodecError::unknown_directive(line))
        }
    }
}

/// One `BATTLE:` block with its date and fleets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BattleBlock {
    /// Battle name.
    pub name: String,
    /// Battle date, conventionally `YYYYMMDD`.
    pub date: u32,
    /// Fleets in file order.
    pub fleets: Vec<FleetLine>,
}

impl BattleBlock {
    /// Creates a block with no fleets.
    pub fn new(name: impl Into<String>, date: u32) -> Self {
        Self {
            name: name.into(),
            date,
            fleets: Vec::new(),
        }
    }
}

impl fmt::Display for BattleBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{BATTLE_PREFIX}{}", self.name)?;
        write!(f, "{DATE_PREFIX}{}", self.date)?;
        for fleet in &self.fleets {
            write!(f, "\n{fleet}")?;
        }
        Ok(())
    }
}

/// A block that has seen its `BATTLE:` line but maybe not its `DATE:` yet.
struct OpenBlock {
    name: String,
    date: Option<u32>,
    fleets: Vec<FleetLine>,
}

impl OpenBlock {
    fn close(self) -> CodecResult<BattleBlock> {
        let date = self.date.ok_or_else(|| {
            CodecError::out_of_order(format!("battle {:?} has no DATE line", self.name))
        })?;
        Ok(BattleBlock {
            name: self.name,
            date,
            fleets: self.fleets,
        })
    }
}

/// Decodes a battle-history document into blocks in file order.
///
/// # Errors
///
/// Returns the first malformed or misplaced line, located with
/// [`CodecError::AtLine`]. A block left without a date at end of input is
/// reported at the last line.
pub fn decode_history(input: &str) -> CodecResult<Vec<BattleBlock>> {
    let mut blocks = Vec::new();
    let mut open: Option<OpenBlock> = None;
    let mut last_line = 0;

    for line in logical_lines(input) {
        last_line = line.number;
        let located = |e: CodecError| e.at_line(line.number);

        match Directive::decode(line.text).map_err(located)? {
            Directive::Battle(name) => {
                if let Some(block) = open.take() {
                    blocks.push(block.close().map_err(located)?);
                }
                open = Some(OpenBlock {
                    name,
                    date: None,
                    fleets: Vec::new(),
                });
            }
            Directive::Date(date) => {
                let block = open
                    .as_mut()
                    .ok_or_else(|| located(CodecError::out_of_order("DATE before any BATTLE")))?;
                if block.date.is_some() {
                    return Err(located(CodecError::out_of_order(format!(
                        "second DATE in battle {:?}",
                        block.name
                    ))));
                }
                block.date = Some(date);
            }
            Directive::Fleet(fleet) => {
                let block = open
                    .as_mut()
                    .ok_or_else(|| located(CodecError::out_of_order("FLEET before any BATTLE")))?;
                if block.date.is_none() {
                    return Err(located(CodecError::out_of_order(format!(
                        "FLEET before DATE in battle {:?}",
                        block.name
                    ))));
                }
                block.fleets.push(fleet);
            }
        }
    }

    if let Some(block) = open {
        blocks.push(block.close().map_err(|e| e.at_line(last_line))?);
    }
    Ok(blocks)
}
