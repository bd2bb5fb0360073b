mod common;

use common::{Primitive, RecordingSink};
use drawall_core::{ErrorCode, Point};
use drawall_parser::{PathInterpreter, StringSource};

fn interpret(data: &str) -> (RecordingSink, drawall_core::Result<()>) {
    let mut sink = RecordingSink::new();
    let mut src = StringSource::from(data);
    let result = PathInterpreter::new().run(&mut src, &mut sink);
    (sink, result)
}

fn p(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

#[test]
fn test_move_line_close() {
    let (sink, result) = interpret("M10 10L20 20Z\"");
    result.unwrap();
    assert_eq!(
        sink.primitives,
        vec![
            Primitive::Move(p(10.0, 10.0)),
            Primitive::Line(p(20.0, 20.0)),
            Primitive::Line(p(10.0, 10.0)),
        ]
    );
}

#[test]
fn test_smooth_cubic_reflects_previous_control() {
    let (sink, result) = interpret("M10,10 C20,10 30,20 30,30 S40,10 40,40\"");
    result.unwrap();
    assert_eq!(
        sink.primitives[2],
        Primitive::Cubic(p(30.0, 40.0), p(40.0, 10.0), p(40.0, 40.0))
    );
}

#[test]
fn test_smooth_cubic_after_line_starts_at_current_point() {
    let (sink, result) = interpret("M0 0 L10 0 S20 10 30 0\"");
    result.unwrap();
    assert_eq!(
        sink.primitives[2],
        Primitive::Cubic(p(10.0, 0.0), p(20.0, 10.0), p(30.0, 0.0))
    );
}

#[test]
fn test_smooth_quadratic_chain() {
    let (sink, result) = interpret("M0 0 Q10 10 20 0 T40 0 T60 0\"");
    result.unwrap();
    assert_eq!(
        sink.drawn()[1..],
        [
            Primitive::Quadratic(p(10.0, 10.0), p(20.0, 0.0)),
            Primitive::Quadratic(p(30.0, -10.0), p(40.0, 0.0)),
            Primitive::Quadratic(p(50.0, 10.0), p(60.0, 0.0)),
        ]
    );
}

#[test]
fn test_quadratic_does_not_feed_cubic_reflection() {
    let (sink, result) = interpret("M0 0 Q10 10 20 0 S30 10 40 0\"");
    result.unwrap();
    assert_eq!(
        sink.primitives[2],
        Primitive::Cubic(p(20.0, 0.0), p(30.0, 10.0), p(40.0, 0.0))
    );
}

#[test]
fn test_relative_commands() {
    let (sink, result) = interpret("m5 5 l10 0 h-3 v4 c1 1 2 2 3 3 z\"");
    result.unwrap();
    assert_eq!(
        sink.primitives,
        vec![
            Primitive::Move(p(5.0, 5.0)),
            Primitive::Line(p(15.0, 5.0)),
            Primitive::Line(p(12.0, 5.0)),
            Primitive::Line(p(12.0, 9.0)),
            Primitive::Cubic(p(13.0, 10.0), p(14.0, 11.0), p(15.0, 12.0)),
            Primitive::Line(p(5.0, 5.0)),
        ]
    );
}

#[test]
fn test_implicit_repetition() {
    let (sink, result) = interpret("L1 1 2 2,3 3 H7 8\"");
    result.unwrap();
    assert_eq!(
        sink.primitives,
        vec![
            Primitive::Line(p(1.0, 1.0)),
            Primitive::Line(p(2.0, 2.0)),
            Primitive::Line(p(3.0, 3.0)),
            Primitive::Line(p(7.0, 3.0)),
            Primitive::Line(p(8.0, 3.0)),
        ]
    );
}

#[test]
fn test_negative_numbers_need_no_separator() {
    let (sink, result) = interpret("M-1-2L3.5.5\"");
    result.unwrap();
    assert_eq!(
        sink.primitives,
        vec![Primitive::Move(p(-1.0, -2.0)), Primitive::Line(p(3.5, 0.5))]
    );
}

#[test]
fn test_arc_is_consumed_and_ignored() {
    let (sink, result) = interpret("M0 0 A5 5 0 0 1 10 10 L1 1\"");
    result.unwrap();
    assert_eq!(
        sink.primitives,
        vec![Primitive::Move(p(0.0, 0.0)), Primitive::Line(p(1.0, 1.0))]
    );
    assert!(sink.warnings.is_empty());
}

#[test]
fn test_unknown_command_is_skipped() {
    let (sink, result) = interpret("M0 0 X4 4 L1 1\"");
    result.unwrap();
    assert_eq!(sink.warnings, vec![ErrorCode::UnknownSvgCommand]);
    assert_eq!(sink.primitives.len(), 2);
}

#[test]
fn test_missing_parameter_warns() {
    let (sink, result) = interpret("M0 0 L5\"");
    result.unwrap();
    assert_eq!(sink.warnings, vec![ErrorCode::MalformedNumber]);
    assert_eq!(sink.primitives.len(), 1);
}

#[test]
fn test_end_of_stream_is_fatal() {
    let (sink, result) = interpret("M0 0 L10 10");
    let err = result.unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::IncompleteSvg));
    assert_eq!(sink.failures, vec![ErrorCode::IncompleteSvg]);

    let (_, inside) = interpret("M0 0 C1 2 3");
    assert_eq!(inside.unwrap_err().code(), Some(ErrorCode::IncompleteSvg));
}

#[test]
fn test_stops_at_closing_quote() {
    let mut sink = RecordingSink::new();
    let mut src = StringSource::from("M1 1\" fill=\"none\"");
    PathInterpreter::new().run(&mut src, &mut sink).unwrap();
    assert_eq!(sink.primitives, vec![Primitive::Move(p(1.0, 1.0))]);
    assert_eq!(drawall_parser::CharSource::position(&src), 5);
}
