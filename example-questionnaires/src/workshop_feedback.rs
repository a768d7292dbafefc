use formscan_model::{QObject, QObjectId, Questionnaire, ScanBox};

/// Mark with four steps.
pub const RATING: QObjectId = QObjectId::new(1, 1);

/// One head and one rating scale on a single page.
pub fn workshop_feedback() -> Questionnaire {
    let mut q = Questionnaire::new().with_survey("Workshop feedback");
    q.add_qobject(QObject::head("Workshop"), None)
        .expect("head");
    let rating = q
        .add_qobject(QObject::mark("How useful was it?", "useless", "very useful").on_page(1), None)
        .expect("rating");
    for i in 0..4 {
        let x = 120.0 + 12.0 * f64::from(i);
        q.add_box(rating, ScanBox::checkbox(x, 45.0, 4.0, 4.0).on_page(1))
            .expect("rating box");
    }
    q
}
