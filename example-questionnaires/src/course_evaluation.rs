use formscan_model::{QObject, QObjectId, Questionnaire, ScanBox};

/// Single choice: no answer, then first to third semester.
pub const SEMESTER: QObjectId = QObjectId::new(1, 2);

/// Choice: lecture, tutorial, lab.
pub const ATTENDANCE: QObjectId = QObjectId::new(1, 3);

/// Mark with five steps from "too slow" to "too fast".
pub const PACE: QObjectId = QObjectId::new(2, 1);

/// Text with one textbox.
pub const COMMENTS: QObjectId = QObjectId::new(2, 2);

/// Additional_Mark filled in after scanning.
pub const OVERALL: QObjectId = QObjectId::new(3, 1);

/// Additional_FilterHistogram of the pace per semester.
pub const PACE_BY_SEMESTER: QObjectId = QObjectId::new(3, 2);

const BOX: f64 = 3.5;

/// Two printed pages plus a report section, covering every QObject variant.
pub fn course_evaluation() -> Questionnaire {
    build(BOX)
}

/// The same form with every checkbox `box_size` wide and high.
pub fn course_evaluation_with_box_size(box_size: f64) -> Questionnaire {
    build(box_size)
}

fn build(box_size: f64) -> Questionnaire {
    let mut q = Questionnaire::new().with_survey("Course evaluation");

    q.add_qobject(QObject::head("About you"), None)
        .expect("head");
    q.add_qobject(QObject::question("Please mark boxes with a cross.").on_page(1), None)
        .expect("intro");

    let semester = q
        .add_qobject(QObject::single_choice("Which semester are you in?").on_page(1), None)
        .expect("semester");
    for (i, label) in ["no answer", "first", "second", "third"].into_iter().enumerate() {
        let x = 30.0 + 35.0 * i as f64;
        q.add_box(
            semester,
            ScanBox::checkbox(x, 62.0, box_size, box_size)
                .with_text(label)
                .on_page(1),
        )
        .expect("semester box");
    }

    let attendance = q
        .add_qobject(QObject::choice("Which events did you attend?").on_page(1), None)
        .expect("attendance");
    for (i, label) in ["lecture", "tutorial", "lab"].into_iter().enumerate() {
        let x = 30.0 + 45.0 * i as f64;
        q.add_box(
            attendance,
            ScanBox::checkbox(x, 80.0, box_size, box_size)
                .with_text(label)
                .on_page(1),
        )
        .expect("attendance box");
    }

    q.add_qobject(QObject::head("The lecture"), None)
        .expect("head");

    let pace = q
        .add_qobject(QObject::mark("The pace was", "too slow", "too fast").on_page(2), None)
        .expect("pace");
    for i in 0..5 {
        let x = 110.0 + 10.0 * f64::from(i);
        q.add_box(pace, ScanBox::checkbox(x, 40.0, box_size, box_size).on_page(2))
            .expect("pace box");
    }

    let comments = q
        .add_qobject(QObject::text("Further comments").on_page(2), None)
        .expect("comments");
    q.add_box(
        comments,
        ScanBox::textbox(20.0, 60.0, 170.0, 50.0).on_page(2),
    )
    .expect("comments box");

    q.add_qobject(QObject::additional_head("Report"), None)
        .expect("report head");
    q.add_qobject(QObject::additional_mark("Overall grade", "poor", "excellent"), None)
        .expect("overall");
    q.add_qobject(
        QObject::additional_filter_histogram(
            "Pace by semester",
            vec!["first".into(), "second".into(), "third".into()],
            vec!["_1_2 == 1".into(), "_1_2 == 2".into(), "_1_2 == 3".into()],
        ),
        None,
    )
    .expect("histogram");

    q
}
