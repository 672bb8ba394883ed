fn main() {
    println!("Run `cargo test -p wire-compat` to execute wire compatibility tests.");
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use adupload_protocol::{
        ErrorResponse, FinishRequest, FinishResponse, GraphErrorBody, ProcessingStatus,
        StartRequest, StartResponse, TransferRequest, TransferResponse, UploadVideoRequest,
        UploadVideoResponse, VideoStatusResponse,
    };
    use adupload_transfer::ChunkAck;

    /// Returns the path to the fixtures directory.
    fn fixtures_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
    }

    /// Loads a fixture JSON file and returns it as a `serde_json::Value`.
    fn load_fixture(name: &str) -> serde_json::Value {
        let path = fixtures_dir().join(name);
        let data = fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("failed to read fixture {}: {e}", path.display()));
        serde_json::from_str(&data)
            .unwrap_or_else(|e| panic!("failed to parse fixture {}: {e}", path.display()))
    }

    /// Deserializes a fixture into a Rust type, re-serializes it, and compares
    /// the JSON values (order-independent comparison).
    fn roundtrip_test<T>(name: &str) -> T
    where
        T: serde::de::DeserializeOwned + serde::Serialize,
    {
        let fixture = load_fixture(name);
        let parsed: T = serde_json::from_value(fixture.clone())
            .unwrap_or_else(|e| panic!("failed to deserialize {name}: {e}"));
        let reserialized = serde_json::to_value(&parsed)
            .unwrap_or_else(|e| panic!("failed to re-serialize {name}: {e}"));

        assert_eq!(
            fixture, reserialized,
            "roundtrip mismatch for {name}:\n  wire: {fixture}\n  Rust: {reserialized}"
        );
        parsed
    }

    // --- Graph requests ---

    #[test]
    fn fixture_start_request() {
        let req: StartRequest = roundtrip_test("start_request.json");
        assert_eq!(req, StartRequest::new(52_428_800));
    }

    #[test]
    fn fixture_transfer_request() {
        let req: TransferRequest = roundtrip_test("transfer_request.json");
        assert_eq!(req, TransferRequest::new("2918432108712345", 1_048_576));
    }

    #[test]
    fn fixture_finish_request() {
        let req: FinishRequest = roundtrip_test("finish_request.json");
        assert_eq!(req, FinishRequest::new("2918432108712345"));
    }

    // --- Graph responses ---

    #[test]
    fn fixture_start_response() {
        let resp: StartResponse = roundtrip_test("start_response.json");
        assert_eq!(resp.start_offset, 0);
        assert_eq!(resp.end_offset, 1_048_576);
    }

    #[test]
    fn fixture_transfer_response() {
        let resp: TransferResponse = roundtrip_test("transfer_response.json");
        assert_eq!(ChunkAck::from(&resp).next_offset, 1_048_576);
    }

    #[test]
    fn fixture_finish_response() {
        let resp: FinishResponse = roundtrip_test("finish_response.json");
        assert!(resp.success);
    }

    #[test]
    fn fixture_video_status_response() {
        let resp: VideoStatusResponse = roundtrip_test("video_status_response.json");
        assert_eq!(resp.processing_status(), ProcessingStatus::Pending);
    }

    #[test]
    fn fixture_graph_error_keeps_unknown_fields() {
        let body: GraphErrorBody = roundtrip_test("graph_error.json");
        assert!(body.error.is_transient());
        assert_eq!(body.error.code, Some(2));
        assert!(body.error.extra.contains_key("error_data"));
    }

    // --- Service API ---

    #[test]
    fn fixture_upload_video_request() {
        let req: UploadVideoRequest = roundtrip_test("upload_video_request.json");
        assert_eq!(req.ad_account_id, "1234567890");
    }

    #[test]
    fn fixture_upload_video_response() {
        let resp: UploadVideoResponse = roundtrip_test("upload_video_response.json");
        assert_eq!(resp, UploadVideoResponse::still_processing("1200451298765432"));
    }

    #[test]
    fn fixture_error_response() {
        let resp: ErrorResponse = roundtrip_test("error_response.json");
        assert_eq!(resp.error, "Video upload failed");
    }

    #[test]
    fn numeric_offsets_are_accepted() {
        let resp: TransferResponse =
            serde_json::from_str(r#"{"start_offset":4096,"end_offset":8192}"#).unwrap();
        assert_eq!(resp.start_offset, 4096);
        assert_eq!(
            serde_json::to_value(&resp).unwrap(),
            serde_json::json!({"start_offset": "4096", "end_offset": "8192"})
        );
    }
}
