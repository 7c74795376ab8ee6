use std::str::FromStr;

use thiserror::Error;
use tower_defense_core::TileCoord;

/// Delimiter separating the schema name from the tile.
const NAME_DELIMITER: char = '@';
/// Delimiter separating the column from the row.
const AXIS_DELIMITER: char = ',';

/// Purchase requested on the command line as `name@column,row`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Placement {
    /// Schema name of the tower or item.
    pub(crate) name: String,
    /// Tile receiving the purchase.
    pub(crate) tile: TileCoord,
}

/// Errors that can occur while parsing a placement argument.
#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum PlacementParseError {
    /// The argument was empty or contained only whitespace.
    #[error("placement was empty")]
    Empty,
    /// The argument did not contain the `@` delimiter.
    #[error("placement '{0}' must look like name@column,row")]
    MissingTile(String),
    /// Nothing preceded the `@` delimiter.
    #[error("placement '{0}' does not name a schema")]
    MissingName(String),
    /// The tile could not be parsed into two coordinates.
    #[error("could not parse tile '{0}'")]
    InvalidTile(String),
}

impl FromStr for Placement {
    type Err = PlacementParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(PlacementParseError::Empty);
        }

        let (name, tile) = trimmed
            .split_once(NAME_DELIMITER)
            .ok_or_else(|| PlacementParseError::MissingTile(trimmed.to_owned()))?;
        let name = name.trim();
        if name.is_empty() {
            return Err(PlacementParseError::MissingName(trimmed.to_owned()));
        }

        Ok(Self {
            name: name.to_owned(),
            tile: parse_tile(tile)?,
        })
    }
}

fn parse_tile(tile: &str) -> Result<TileCoord, PlacementParseError> {
    let invalid = || PlacementParseError::InvalidTile(tile.to_owned());
    let (column, row) = tile.split_once(AXIS_DELIMITER).ok_or_else(invalid)?;
    let column = column.trim().parse::<u32>().map_err(|_| invalid())?;
    let row = row.trim().parse::<u32>().map_err(|_| invalid())?;
    Ok(TileCoord::new(column, row))
}
