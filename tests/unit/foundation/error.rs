use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        StrokeError::invalid_input("x")
            .to_string()
            .contains("invalid input:")
    );
    assert!(StrokeError::cache("x").to_string().contains("cache error:"));
    assert!(
        StrokeError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
    let err = StrokeError::InfeasibleDistribution {
        items: 11,
        buckets: 10,
        limit: 1,
    };
    assert!(err.to_string().contains("11 items into 10 buckets of 1"));
}

#[test]
fn at_loop_retags_only_loop_errors() {
    let err = StrokeError::UnreachablePath {
        cell: 0,
        boundary: 0,
    }
    .at_loop(3, 1);
    assert!(matches!(
        err,
        StrokeError::UnreachablePath {
            cell: 3,
            boundary: 1
        }
    ));

    let err = StrokeError::SearchAborted {
        cell: 0,
        boundary: 0,
        steps: 9,
    }
    .at_loop(2, 4);
    assert!(matches!(
        err,
        StrokeError::SearchAborted {
            cell: 2,
            boundary: 4,
            steps: 9
        }
    ));

    let err = StrokeError::invalid_input("x").at_loop(1, 1);
    assert!(matches!(err, StrokeError::InvalidInput(_)));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = StrokeError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
