use std::path::Path;

use anyhow::Context;
use tracing::info;
use weft_http::{HttpPipeline, Part, StackConfig};

use crate::script::Script;
use crate::terminal::TerminalKind;

pub async fn run(stack: &Path, script: &Path, terminal: TerminalKind) -> anyhow::Result<()> {
    let config = StackConfig::from_file(stack)?;
    let script = Script::from_file(script)?;

    let mut pipeline = config.pipeline(terminal.build(config.max_body()));
    info!(
        transformers = ?pipeline.transformer_names(),
        terminal = pipeline.terminal().name(),
        "pipeline assembled"
    );

    drive(&mut pipeline, &script, |part| {
        for line in render(part) {
            println!("{line}");
        }
    })
    .await
}

/// Deliver every scripted event in order, handing each output part to `emit`.
async fn drive(
    pipeline: &mut HttpPipeline,
    script: &Script,
    mut emit: impl FnMut(&Part),
) -> anyhow::Result<()> {
    for (index, (delay, event)) in script.events().into_iter().enumerate() {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        let kind = event.kind();
        let parts = pipeline
            .dispatch(event)
            .with_context(|| format!("event {} ({kind}) failed", index + 1))?;
        for part in &parts {
            emit(part);
        }
    }
    Ok(())
}

/// Human-readable lines for one output part.
fn render(part: &Part) -> Vec<String> {
    match part {
        Part::Head(head) => {
            let mut lines = vec![format!("< {} {}", head.status, head.reason())];
            lines.extend(head.headers.iter().map(|h| format!("< {}: {}", h.name, h.value)));
            lines
        }
        Part::Data(data) => match std::str::from_utf8(data) {
            Ok(text) => vec![text.to_string()],
            Err(_) => vec![format!("[{} bytes]", data.len())],
        },
        Part::Tail(trailers) => {
            let mut lines: Vec<String> =
                trailers.iter().map(|h| format!("< {}: {}", h.name, h.value)).collect();
            lines.push("< end".to_string());
            lines
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use bytes::Bytes;
    use weft_http::ResponseHead;

    use super::*;

    fn stack(toml: &str) -> StackConfig {
        StackConfig::from_toml(toml).unwrap()
    }

    async fn collect(pipeline: &mut HttpPipeline, script: &str) -> anyhow::Result<Vec<Part>> {
        let script = Script::from_toml(script).unwrap();
        let mut parts = Vec::new();
        drive(pipeline, &script, |p| parts.push(p.clone())).await?;
        Ok(parts)
    }

    #[tokio::test]
    async fn echo_through_method_override() {
        let config = stack(
            "[[transformer]]\nkind = \"logger\"\n\n[[transformer]]\nkind = \"method_override\"\n",
        );
        let mut pipeline = config.pipeline(TerminalKind::Echo.build(config.max_body()));
        let parts = collect(
            &mut pipeline,
            r#"
[[event]]
kind = "head"
method = "POST"
target = "/items/3?_method=PATCH"

[[event]]
kind = "data"
text = "name=weft"

[[event]]
kind = "tail"
"#,
        )
        .await
        .unwrap();

        assert!(matches!(&parts[0], Part::Head(h) if h.status == 200));
        let rendered: Vec<String> = parts.iter().flat_map(render).collect();
        let body = "PATCH /items/3?_method=PATCH\nname=weft".to_string();
        assert!(rendered.contains(&body), "{rendered:?}");
        assert_eq!(rendered.last().map(String::as_str), Some("< end"));
    }

    #[tokio::test]
    async fn event_stream_honours_delays() {
        let config = stack("");
        let mut pipeline = config.pipeline(TerminalKind::Events.build(config.max_body()));
        let started = Instant::now();
        let parts = collect(
            &mut pipeline,
            r#"
[[event]]
kind = "head"
target = "/events"

[[event]]
kind = "tail"

[[event]]
kind = "info"
info = { message = "first" }
delay_ms = 20

[[event]]
kind = "info"
info = "timeout"
delay_ms = 20
"#,
        )
        .await
        .unwrap();

        assert!(started.elapsed() >= Duration::from_millis(40));
        assert_eq!(parts.len(), 3);
        let frame: &[u8] = b"id: 1\nevent: message\ndata: first\n\n";
        assert!(matches!(&parts[1], Part::Data(d) if d.as_ref() == frame));
        assert!(parts[2].is_tail());
    }

    #[tokio::test]
    async fn failing_event_is_reported_with_its_position() {
        let config = stack("[[transformer]]\nkind = \"body_limit\"\nmax_bytes = 4\n");
        let mut pipeline = config.pipeline(TerminalKind::Echo.build(config.max_body()));
        let err = collect(
            &mut pipeline,
            "[[event]]\nkind = \"head\"\nmethod = \"POST\"\n\n[[event]]\nkind = \"data\"\ntext = \"too long\"\n",
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("event 2 (data) failed"), "{err:#}");
    }

    #[tokio::test]
    async fn demo_exchanges_complete() {
        let demos = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos");
        for (name, terminal) in [("echo", TerminalKind::Echo), ("events", TerminalKind::Events)] {
            let dir = demos.join(name);
            let config = StackConfig::from_file(&dir.join("stack.toml")).unwrap();
            let script = Script::from_file(&dir.join("exchange.toml")).unwrap();
            let mut pipeline = config.pipeline(terminal.build(config.max_body()));

            let mut parts = Vec::new();
            drive(&mut pipeline, &script, |p| parts.push(p.clone())).await.unwrap();
            assert!(parts.first().is_some_and(Part::is_head), "{name}");
            assert!(parts.last().is_some_and(Part::is_tail), "{name}");
        }
    }

    #[test]
    fn render_parts() {
        let head = Part::Head(ResponseHead::new(404).with_header("content-type", "text/plain"));
        assert_eq!(render(&head), vec!["< 404 Not Found", "< content-type: text/plain"]);
        assert_eq!(render(&Part::Data(Bytes::from_static(&[0xff, 0xfe]))), vec!["[2 bytes]"]);
    }
}
