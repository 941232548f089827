//! Single-line map transfer strings.
//!
//! A map travels as `dungeonion:v1:<width>x<height>:<payload>` where the
//! payload is the JSON map snapshot encoded as unpadded base64.

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use dungeonion_core::MapSnapshot;
use thiserror::Error;

const TRANSFER_DOMAIN: &str = "dungeonion";
const TRANSFER_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded snapshot payload.
pub(crate) const TRANSFER_HEADER: &str = "dungeonion:v1";
/// Delimiter used to separate the prefix, grid dimensions and payload.
const FIELD_DELIMITER: char = ':';

/// Errors that can occur while encoding or decoding map transfer strings.
#[derive(Debug, Error)]
pub(crate) enum MapTransferError {
    /// The provided string was empty or contained only whitespace.
    #[error("map string was empty")]
    EmptyPayload,
    /// The string ended before the named segment.
    #[error("map string is missing the {0}")]
    MissingSegment(&'static str),
    /// The encoded map used an unexpected prefix segment.
    #[error("map prefix '{0}' is not supported")]
    InvalidPrefix(String),
    /// The encoded map used an unsupported version identifier.
    #[error("map version '{0}' is not supported")]
    UnsupportedVersion(String),
    /// The grid dimensions could not be parsed.
    #[error("could not parse grid dimensions '{0}'")]
    InvalidDimensions(String),
    /// The header and the payload disagree on the grid size.
    #[error("header announces {header_columns}x{header_rows} but the map is {columns}x{rows}")]
    DimensionMismatch {
        /// Columns named in the header.
        header_columns: u32,
        /// Rows named in the header.
        header_rows: u32,
        /// Columns stored in the payload.
        columns: u32,
        /// Rows stored in the payload.
        rows: u32,
    },
    /// The base64 payload could not be decoded.
    #[error("could not decode map payload: {0}")]
    InvalidEncoding(#[from] base64::DecodeError),
    /// The payload could not be converted to or from JSON.
    #[error("could not parse map payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),
}

/// Encodes a snapshot into a single line suitable for clipboard transfer.
pub(crate) fn encode(snapshot: &MapSnapshot) -> Result<String, MapTransferError> {
    let json = serde_json::to_vec(snapshot)?;
    let encoded = STANDARD_NO_PAD.encode(json);
    Ok(format!(
        "{TRANSFER_HEADER}:{}x{}:{encoded}",
        snapshot.width, snapshot.height
    ))
}

/// Decodes a snapshot from its transfer string.
pub(crate) fn decode(value: &str) -> Result<MapSnapshot, MapTransferError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(MapTransferError::EmptyPayload);
    }

    let mut parts = trimmed.splitn(4, FIELD_DELIMITER);
    let domain = parts
        .next()
        .ok_or(MapTransferError::MissingSegment("prefix"))?;
    let version = parts
        .next()
        .ok_or(MapTransferError::MissingSegment("version"))?;
    let dimensions = parts
        .next()
        .ok_or(MapTransferError::MissingSegment("grid dimensions"))?;
    let payload = parts
        .next()
        .ok_or(MapTransferError::MissingSegment("payload"))?;

    if domain != TRANSFER_DOMAIN {
        return Err(MapTransferError::InvalidPrefix(domain.to_owned()));
    }
    if version != TRANSFER_VERSION {
        return Err(MapTransferError::UnsupportedVersion(version.to_owned()));
    }

    let (columns, rows) = parse_dimensions(dimensions)?;
    let bytes = STANDARD_NO_PAD.decode(payload.as_bytes())?;
    let snapshot: MapSnapshot = serde_json::from_slice(&bytes)?;

    if (snapshot.width, snapshot.height) != (columns, rows) {
        return Err(MapTransferError::DimensionMismatch {
            header_columns: columns,
            header_rows: rows,
            columns: snapshot.width,
            rows: snapshot.height,
        });
    }
    Ok(snapshot)
}

fn parse_dimensions(dimensions: &str) -> Result<(u32, u32), MapTransferError> {
    let invalid = || MapTransferError::InvalidDimensions(dimensions.to_owned());
    let (columns, rows) = dimensions.split_once(['x', 'X']).ok_or_else(invalid)?;

    let columns = columns.trim().parse::<u32>().map_err(|_| invalid())?;
    let rows = rows.trim().parse::<u32>().map_err(|_| invalid())?;
    if columns == 0 || rows == 0 {
        return Err(invalid());
    }

    Ok((columns, rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use dungeonion_core::TileId;

    fn sample() -> MapSnapshot {
        let mut map = MapSnapshot::filled(4, 3, 16, TileId::DEFAULT_FLOOR);
        map.grid[1][2].push(TileId::new(13));
        map.grid[0][0].clear();
        map
    }

    #[test]
    fn encoded_map_reloads_unchanged() {
        let map = sample();
        let encoded = encode(&map).expect("map encodes");
        assert!(encoded.starts_with(&format!("{TRANSFER_HEADER}:4x3:")));
        assert!(!encoded.ends_with('='));

        let decoded = decode(&format!("  {encoded}\n")).expect("map decodes");
        assert_eq!(decoded, map);
    }

    #[test]
    fn malformed_strings_are_reported() {
        assert!(matches!(decode("   "), Err(MapTransferError::EmptyPayload)));
        assert!(matches!(
            decode("dungeonion:v1"),
            Err(MapTransferError::MissingSegment("grid dimensions"))
        ));
        assert!(matches!(
            decode("arena:v1:4x3:e30"),
            Err(MapTransferError::InvalidPrefix(prefix)) if prefix == "arena"
        ));
        assert!(matches!(
            decode("dungeonion:v2:4x3:e30"),
            Err(MapTransferError::UnsupportedVersion(version)) if version == "v2"
        ));
        assert!(matches!(
            decode("dungeonion:v1:0x3:e30"),
            Err(MapTransferError::InvalidDimensions(_))
        ));
        assert!(matches!(
            decode("dungeonion:v1:4x3:!!!"),
            Err(MapTransferError::InvalidEncoding(_))
        ));
        let not_json = STANDARD_NO_PAD.encode("not json");
        assert!(matches!(
            decode(&format!("dungeonion:v1:4x3:{not_json}")),
            Err(MapTransferError::InvalidPayload(_))
        ));
    }

    #[test]
    fn header_must_match_payload() {
        let encoded = encode(&sample()).expect("map encodes");
        let forged = encoded.replacen(":4x3:", ":8x3:", 1);
        let error = decode(&forged).unwrap_err();
        assert!(matches!(
            error,
            MapTransferError::DimensionMismatch {
                header_columns: 8,
                columns: 4,
                ..
            }
        ));
        assert_eq!(
            error.to_string(),
            "header announces 8x3 but the map is 4x3"
        );
    }
}
