//! HTTP span helpers.

use uuid::Uuid;

#[derive(Debug, Clone)]
pub(super) struct RequestSpanName {
    pub(super) otel_path: String,
    pub(super) otel_span_name: String,
}

pub(super) fn request_span_name(method: &str, path: &str) -> RequestSpanName {
    let otel_path = route_template(path);
    let otel_span_name = format!("{method} {otel_path}");

    RequestSpanName {
        otel_path,
        otel_span_name,
    }
}

/// Replace identifier segments with the route parameter they fill, keeping metric
/// label cardinality bounded.
fn route_template(path: &str) -> String {
    if path == "/" {
        return "/".to_owned();
    }

    let mut previous = "";
    let mut segments = Vec::new();

    for segment in path.trim_start_matches('/').split('/') {
        if Uuid::parse_str(segment).is_ok() {
            segments.push(match previous {
                "lines" => "{line}",
                "orders" => "{order}",
                _ => "{uuid}",
            });
        } else {
            segments.push(segment);
        }

        previous = segment;
    }

    format!("/{}", segments.join("/"))
}
