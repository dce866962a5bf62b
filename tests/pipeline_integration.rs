//! End-to-end runs through the public API: adapt a payload, build the
//! pipeline from configuration, run it once.

use m3u_transform::config::Config;
use m3u_transform::pipeline::{
    PipelineBuilder, PipelineError, PipelineOrchestrator, StripVlcOptionsStage,
    TransformContext, TransformInput, TransformPlugin,
};
use m3u_transform::sources::{self, SourceFormat};
use std::path::Path;

const NSTREAM_JSON: &str = r#"{
    "categories": [
        {"category_id": "1", "category_title": "UK"},
        {"category_id": 2, "category_title": "News"}
    ],
    "channels": [
        {"title": "BBC One HD", "stream_url": "http://s/1", "category_id": "1"},
        {"title": "BBC One 4K", "stream_url": "http://s/2", "category_id": "1"},
        {"title": "News 24", "stream_url": "http://s/3", "logo": "http://l/3.png", "category_id": "1,2"},
        {"title": "Dead", "stream_url": "", "category_id": "2"}
    ]
}"#;

fn config(toml: &str) -> Config {
    Config::from_toml_str(toml).expect("valid config")
}

fn run(config: Config, input: TransformInput) -> Result<String, PipelineError> {
    let orchestrator = PipelineBuilder::new(config).build().expect("pipeline builds");
    orchestrator.run(input, "test").map(|output| output.playlist)
}

#[test]
fn test_listing_to_deduplicated_playlist() {
    let input = sources::adapt(
        SourceFormat::Auto,
        Some(Path::new("list.json")),
        NSTREAM_JSON.as_bytes(),
    )
    .unwrap();

    let playlist = run(Config::default(), input).unwrap();

    assert_eq!(
        playlist,
        "#EXTM3U\n\
         #EXTINF:0 group-title=\"UK\",BBC One\n\
         http://s/2\n\
         #EXTINF:0 group-title=\"UK\",BBC One\n\
         http://s/1\n\
         #EXTINF:0 tvg-logo=\"http://l/3.png\" group-title=\"UK;News\",News 24\n\
         http://s/3\n"
    );
}

#[test]
fn test_group_title_cap_from_config() {
    let input = sources::adapt(SourceFormat::NstreamJson, None, NSTREAM_JSON.as_bytes()).unwrap();
    let playlist = run(
        config("[pipeline]\nsteps = [\"channel_list\"]\n[channel_list]\nmax_group_titles = 1"),
        input,
    )
    .unwrap();

    assert!(playlist.contains("group-title=\"UK\",News 24"));
    assert!(!playlist.contains("Dead"));
}

#[test]
fn test_nstream_xml_defaults_to_single_group_title() {
    let xml = r#"<items>
        <category><category_id>1</category_id><category_title>UK</category_title></category>
        <category><category_id>2</category_id><category_title>News</category_title></category>
        <channel><title>News 24</title><stream_url>http://s/3</stream_url><category_id>2,1</category_id></channel>
    </items>"#;
    let input = sources::adapt(SourceFormat::Auto, None, xml.as_bytes()).unwrap();
    let playlist = run(config("[pipeline]\nsteps = [\"channel_list\"]"), input).unwrap();

    assert_eq!(playlist, "#EXTM3U\n#EXTINF:0 group-title=\"News\",News 24\nhttp://s/3\n");
}

#[test]
fn test_playlist_cleanup_chain() {
    let input = "#EXTM3U url-tvg=\"http://epg/guide.xml\"\n\
        #EXTINF:-1 tvg-id=\"first\" group-title=\"Общие\",Первый канал HD\n\
        #EXTVLCOPT:http-user-agent=Mozilla/5.0\n\
        http://s/first-hd\n\
        #EXTINF:-1 tvg-id=\"first\" group-title=\"Общие\",Первый 50 orig\n\
        http://s/first-orig\n\
        #EXTINF:-1 tvg-id=\"first\" group-title=\"Общие\",Первый FHD\n\
        http://s/first-fhd\n\
        #EXTINF:-1 group-title=\"Музыка\",Муз ТВ\n\
        #EXTGRP:Музыка\n\
        http://s/muz\n";

    let config = config(
        r#"
        [pipeline]
        steps = ["strip_vlc_options", "rename_groups", "deduplicate"]

        [deduplicate]
        exclusion_suffixes = [" 50 orig"]

        [[deduplicate.normalization_rules]]
        pattern = "Первый канал"
        replacement = "Первый"
        "#,
    );

    let playlist = run(config, TransformInput::Playlist(input.to_string())).unwrap();

    assert_eq!(
        playlist,
        "#EXTM3U url-tvg=\"http://epg/guide.xml\"\n\
         #EXTINF:-1 tvg-id=\"first\" group-title=\"HLS-Proxy\",Первый\n\
         http://s/first-fhd\n\
         #EXTINF:-1 tvg-id=\"first\" group-title=\"HLS-Proxy\",Первый\n\
         http://s/first-hd\n\
         #EXTINF:-1 group-title=\"HLS-Proxy\",Муз ТВ\n\
         #EXTGRP:HLS-Proxy\n\
         http://s/muz\n"
    );
}

#[test]
fn test_listing_step_rejects_playlist_input() {
    let err = run(
        Config::default(),
        TransformInput::Playlist("#EXTM3U\n#EXTINF:-1,A\nhttp://a\n".to_string()),
    )
    .unwrap_err();

    assert_eq!(err.stage(), Some("channel_list"));
    assert_eq!(err.step(), Some(0));
}

#[test]
fn test_not_a_playlist_reports_failing_step() {
    let err = run(
        config("[pipeline]\nsteps = [\"deduplicate\"]"),
        TransformInput::Playlist("<html>not found</html>".to_string()),
    )
    .unwrap_err();

    assert_eq!(err.stage(), Some("deduplicate"));
    let message = err.to_string();
    assert!(message.contains("step 1"), "{message}");
    assert!(message.contains("playlist (22 bytes)"), "{message}");
}

struct RejectEverything;

impl TransformPlugin for RejectEverything {
    fn stage_id(&self) -> &'static str {
        "reject"
    }

    fn stage_name(&self) -> &'static str {
        "Reject Everything"
    }

    fn execute(
        &self,
        input: &TransformInput,
        _context: &TransformContext,
    ) -> Result<String, PipelineError> {
        let text = input.as_playlist(self.stage_id())?;
        Err(PipelineError::stage_error(
            self.stage_id(),
            format!("refusing {} bytes", text.len()),
        ))
    }
}

#[test]
fn test_custom_plugin_failure_aborts_run() {
    let pipeline = PipelineOrchestrator::new()
        .with_stage(StripVlcOptionsStage::new())
        .with_stage(RejectEverything);

    let input = "#EXTINF:-1,A\n#EXTVLCOPT:x=y\nhttp://a\n".to_string();
    let err = pipeline
        .run(TransformInput::Playlist(input), "test")
        .unwrap_err();

    assert_eq!(err.stage(), Some("reject"));
    assert_eq!(err.step(), Some(1));
    // Second step saw the first step's output, not the raw input
    assert!(err.to_string().contains("refusing 30 bytes"), "{err}");
}

#[test]
fn test_transform_entry_point() {
    let track_list = r#"<playlist><trackList>
        <track><title>Film HD</title><location>http://s/hd</location></track>
        <track><title>Film 4K</title><location>http://s/4k</location><image>http://l/f.png</image></track>
    </trackList></playlist>"#;

    let output = m3u_transform::transform(
        &Config::default(),
        Some(Path::new("tracks.xml")),
        track_list.as_bytes(),
        "tracks.xml",
    )
    .unwrap();

    assert_eq!(
        output.playlist,
        "#EXTM3U\n\
         #EXTINF:0 tvg-logo=\"http://l/f.png\",Film\n\
         http://s/4k\n\
         #EXTINF:0,Film\n\
         http://s/hd\n"
    );
    assert_eq!(output.stages.len(), 2);
}

#[test]
fn test_transform_reports_bad_payload() {
    let err = m3u_transform::transform(&Config::default(), None, b"{\"channels\": {}}", "stdin")
        .unwrap_err();
    assert!(matches!(err, m3u_transform::AppError::Source(_)));
}

#[test]
fn test_default_config_accepts_playlist_input() {
    let playlist = b"#EXTM3U\n\
        #EXTINF:-1,News HD\n\
        http://s/hd\n\
        #EXTINF:-1,News 4K\n\
        http://s/4k\n";

    let output = m3u_transform::transform(
        &Config::default(),
        Some(Path::new("list.m3u8")),
        playlist,
        "list.m3u8",
    )
    .unwrap();

    assert_eq!(
        output.playlist,
        "#EXTM3U\n#EXTINF:-1,News\nhttp://s/4k\n#EXTINF:-1,News\nhttp://s/hd\n"
    );
    assert_eq!(
        output.stages.iter().map(|r| r.stage_id).collect::<Vec<_>>(),
        vec!["deduplicate"]
    );
}
