use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::schema::EncodingStrategy;

/// A failure of one of the opaque byte encodings.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DataError {
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("binary archive encoding failed: {0}")]
    ArchiveEncode(#[from] ciborium::ser::Error<std::io::Error>),

    #[error("binary archive decoding failed: {0}")]
    ArchiveDecode(#[from] ciborium::de::Error<std::io::Error>),

    #[error("the {0} strategy does not produce bytes")]
    NotByteEncoded(EncodingStrategy),
}

/// Serializes `value` with the byte encoding of `strategy`.
pub fn encode_data<T: Serialize + ?Sized>(
    strategy: EncodingStrategy,
    value: &T,
) -> Result<Vec<u8>, DataError> {
    match strategy {
        EncodingStrategy::OpaqueCodable => Ok(serde_json::to_vec(value)?),
        EncodingStrategy::OpaqueBinary => {
            let mut bytes = Vec::new();
            ciborium::into_writer(value, &mut bytes)?;
            Ok(bytes)
        }
        EncodingStrategy::RawValue => Err(DataError::NotByteEncoded(strategy)),
    }
}

/// Deserializes bytes produced by [`encode_data`] with the same `strategy`.
pub fn decode_data<T: DeserializeOwned>(
    strategy: EncodingStrategy,
    bytes: &[u8],
) -> Result<T, DataError> {
    match strategy {
        EncodingStrategy::OpaqueCodable => Ok(serde_json::from_slice(bytes)?),
        EncodingStrategy::OpaqueBinary => Ok(ciborium::from_reader(bytes)?),
        EncodingStrategy::RawValue => Err(DataError::NotByteEncoded(strategy)),
    }
}
