//! Human-readable dump of a questionnaire, for diagnostics and golden files.

use std::fmt;

use crate::{MarkInfo, QObject, QObjectKind, Questionnaire, QuestionInfo, ScanBox};

/// Render the whole tree, one line per element, in identifier order.
pub fn to_text(questionnaire: &Questionnaire) -> String {
    let mut text = String::from("Questionnaire\n");
    for qobject in questionnaire.qobjects() {
        text.push_str(&render_qobject(qobject));
    }
    text
}

fn render_qobject(qobject: &QObject) -> String {
    let mut s = String::new();
    match qobject.kind() {
        QObjectKind::Head(head) | QObjectKind::AdditionalHead(head) => {
            s.push_str(&format!(
                "{}({}) {}\n",
                qobject.id().id_str(),
                qobject.type_name(),
                head.title
            ));
        }
        QObjectKind::Question(info) => {
            s.push_str(&question_line(qobject, info));
        }
        QObjectKind::Choice(info) | QObjectKind::SingleChoice(info) | QObjectKind::Text(info) => {
            s.push_str(&question_line(qobject, info));
            s.push_str(&render_boxes(qobject.boxes()));
        }
        QObjectKind::Mark(mark) => {
            s.push_str(&question_line(qobject, &mark.question));
            s.push_str(&scale_line(mark));
            s.push_str(&render_boxes(qobject.boxes()));
        }
        QObjectKind::AdditionalMark(mark) => {
            s.push_str(&question_line(qobject, &mark.question));
            s.push_str(&scale_line(mark));
        }
        QObjectKind::AdditionalFilterHistogram(histogram) => {
            s.push_str(&question_line(qobject, &histogram.question));
            for (answer, filter) in histogram.answers.iter().zip(&histogram.filters) {
                s.push_str(&format!("\t{answer} - {filter}\n"));
            }
        }
    }
    s
}

fn question_line(qobject: &QObject, info: &QuestionInfo) -> String {
    format!(
        "{}({}) {} {{{}}}\n",
        qobject.id().id_str(),
        qobject.type_name(),
        info.question,
        info.page_number
    )
}

fn scale_line(mark: &MarkInfo) -> String {
    match mark.answers.as_slice() {
        [low, high] => format!("\t{low} - {high}\n"),
        _ => "\t? - ?\n".to_string(),
    }
}

fn render_boxes(boxes: &[ScanBox]) -> String {
    boxes.iter().map(render_box).collect()
}

fn render_box(scan_box: &ScanBox) -> String {
    format!(
        "\t{}({:<8}) {:>5.1} {:>5.1} {:>5.1} {:>5.1} {}\n",
        scan_box.value(),
        scan_box.kind().type_name(),
        scan_box.x,
        scan_box.y,
        scan_box.width,
        scan_box.height,
        scan_box.text
    )
}

impl fmt::Display for Questionnaire {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&to_text(self))
    }
}
