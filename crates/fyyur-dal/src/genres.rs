use fyyur_types::Genres;

use crate::error::{Error, Result};

pub(crate) fn encode(genres: &Genres) -> Result<String> {
    Ok(serde_json::to_string(genres)?)
}

pub(crate) fn decode(raw: &str, id: i64) -> Result<Genres> {
    serde_json::from_str(raw).map_err(|e| Error::MalformedData {
        field: "genres",
        id,
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use fyyur_types::Genre;

    use super::*;

    #[test]
    fn test_decode_stored() {
        let genres = decode(r#"["Folk","Jazz"]"#, 1).unwrap();
        assert!(genres.contains(Genre::Folk));
        assert_eq!(encode(&genres).unwrap(), r#"["Folk","Jazz"]"#);
    }

    #[test]
    fn test_decode_malformed() {
        for raw in ["not json", "{Jazz}", r#"["Polka"]"#, "[]", r#""Jazz""#] {
            match decode(raw, 7) {
                Err(Error::MalformedData { field, id, .. }) => {
                    assert_eq!(field, "genres");
                    assert_eq!(id, 7);
                }
                other => panic!("Unexpected result for {raw}: {other:?}"),
            }
        }
    }
}
