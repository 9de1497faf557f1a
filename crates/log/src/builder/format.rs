//! Format-layer construction macros, kept as macros (rather than functions)
//! because each arm of `tracing_subscriber::fmt::Layer` is a distinct
//! monomorphized type and a function would need to box every combination
//! anyway.

/// Builds a `tracing_subscriber::fmt` layer for pretty or compact output,
/// honoring the display toggles in `$display`.
macro_rules! create_fmt_layer {
    (pretty, $display:expr, $writer:expr) => {{
        let display = $display;
        tracing_subscriber::fmt::layer()
            .pretty()
            .with_ansi(display.colors)
            .with_file(display.source)
            .with_line_number(display.source)
            .with_target(true)
            .with_timer(crate::format::make_timer(None))
            .with_writer($writer)
    }};
    (compact, $display:expr, $writer:expr) => {{
        let display = $display;
        tracing_subscriber::fmt::layer()
            .compact()
            .with_ansi(display.colors)
            .with_file(display.source)
            .with_line_number(display.source)
            .with_target(true)
            .with_timer(crate::format::make_timer(None))
            .with_writer($writer)
    }};
}

/// Builds a JSON-output layer, flattening event fields when requested.
macro_rules! create_json_layer {
    ($display:expr, $writer:expr) => {{
        let display = $display;
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(display.flatten)
            .with_ansi(false)
            .with_file(display.source)
            .with_line_number(display.source)
            .with_current_span(true)
            .with_span_list(true)
            .with_timer(crate::format::make_timer(None))
            .with_writer($writer)
    }};
}
