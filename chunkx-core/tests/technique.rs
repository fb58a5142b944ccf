use chunkx_core::{ChunkError, EncoderTechnique};

#[test]
fn codes_are_stable() {
    assert_eq!(EncoderTechnique::Vandermonde.code(), 0);
    assert_eq!(EncoderTechnique::Cauchy.code(), 1);
    for t in EncoderTechnique::ALL {
        assert_eq!(EncoderTechnique::try_from(t.code()).unwrap(), t);
    }
}

#[test]
fn unknown_code_rejected() {
    for code in 2..=u8::MAX {
        assert!(matches!(EncoderTechnique::try_from(code), Err(ChunkError::UnknownTechnique(c)) if c == code));
    }
}

#[test]
fn names_parse_and_display() {
    assert_eq!("cauchy".parse::<EncoderTechnique>().unwrap(), EncoderTechnique::Cauchy);
    assert_eq!("Vandermonde".parse::<EncoderTechnique>().unwrap(), EncoderTechnique::Vandermonde);
    assert!("xor".parse::<EncoderTechnique>().is_err());
    assert_eq!(EncoderTechnique::Cauchy.to_string(), "cauchy");
}
