use super::*;
use crate::document::fixtures::{SectionSpec, article};

fn cues() -> LexicalCues {
    LexicalCues::new().expect("cue regexes should compile")
}

fn label_of(document: &Document, labeler: &SentenceLabeler<'_>, text: &str) -> Label {
    let sentence = document
        .sentences()
        .iter()
        .find(|sentence| sentence.text == text)
        .unwrap_or_else(|| panic!("missing fixture sentence: {text}"));
    labeler.label(document, sentence)
}

#[test]
fn every_sentence_receives_a_label() {
    let cues = cues();
    let document = article(
        "T0",
        vec![
            SectionSpec::untitled().paragraph(&["Preamble without a heading."]),
            SectionSpec::titled("Discussion").paragraph(&["This study has limitations."]),
        ],
    );

    for variant in [
        Variant::Loose,
        Variant::Baseline,
        Variant::Strict,
        Variant::ParagraphOnly,
        Variant::DocumentLevel,
    ] {
        let labels = SentenceLabeler::new(&cues, variant).label_document(&document);
        assert_eq!(labels.len(), document.sentences().len());
    }
}

#[test]
fn sentences_outside_discussion_like_sections_are_negative() {
    let cues = cues();
    let document = article(
        "T1",
        vec![
            SectionSpec::titled("Methods")
                .paragraph(&["This limitation is severe."])
                .child(SectionSpec::titled("Limitations").paragraph(&["The sample was small."])),
        ],
    );

    for variant in [Variant::Loose, Variant::Baseline, Variant::Strict] {
        let labeler = SentenceLabeler::new(&cues, variant);
        assert_eq!(
            label_of(&document, &labeler, "This limitation is severe."),
            Label::Neg
        );
        assert_eq!(
            label_of(&document, &labeler, "The sample was small."),
            Label::Neg
        );
    }
}

#[test]
fn sentences_without_any_section_are_negative() {
    let cues = cues();
    let raw = r#"{"text": "Our study has several limitations.", "sentences": [{"begin": 0, "end": 34}]}"#;
    let document = Document::from_json(raw, "T2").expect("document should parse");
    let labeler = SentenceLabeler::new(&cues, Variant::Loose);

    assert_eq!(labeler.label(&document, &document.sentences()[0]), Label::Neg);
}

#[test]
fn limitations_section_content_is_positive() {
    let cues = cues();
    let document = article(
        "T3",
        vec![SectionSpec::titled("Limitations").paragraph(&["The sample size was small."])],
    );

    for variant in [Variant::Loose, Variant::Baseline, Variant::Strict] {
        let labeler = SentenceLabeler::new(&cues, variant);
        assert_eq!(
            label_of(&document, &labeler, "The sample size was small."),
            Label::Pos,
            "{}",
            variant.as_str()
        );
    }
}

#[test]
fn nested_limitations_subsection_uses_its_own_title() {
    let cues = cues();
    let document = article(
        "T4",
        vec![
            SectionSpec::titled("Discussion")
                .paragraph(&["Our results extend prior work."])
                .child(
                    SectionSpec::titled("Limitations")
                        .paragraph(&["Exposure was measured only once."]),
                ),
        ],
    );
    let labeler = SentenceLabeler::new(&cues, Variant::Loose);

    assert_eq!(
        label_of(&document, &labeler, "Our results extend prior work."),
        Label::Neg
    );
    assert_eq!(
        label_of(&document, &labeler, "Exposure was measured only once."),
        Label::Pos
    );
}

#[test]
fn strict_variant_suppresses_list_continuations() {
    let cues = cues();
    let document = article(
        "T5",
        vec![SectionSpec::titled("Limitations").paragraph(&[
            "First, recruitment was restricted to one site.",
            "However, generalizability was limited.",
        ])],
    );
    let text = "However, generalizability was limited.";

    let strict = SentenceLabeler::new(&cues, Variant::Strict);
    assert_eq!(label_of(&document, &strict, text), Label::Neg);
    assert_eq!(
        label_of(&document, &strict, "First, recruitment was restricted to one site."),
        Label::Pos
    );

    let loose = SentenceLabeler::new(&cues, Variant::Loose);
    assert_eq!(label_of(&document, &loose, text), Label::Pos);
}

#[test]
fn strict_variant_keeps_enumerated_items_in_limitation_sections() {
    let cues = cues();
    let text = "Finally, generalizability was limited.";
    let document = article(
        "T5b",
        vec![SectionSpec::titled("Limitations").paragraph(&[
            "First, recruitment was restricted to one site.",
            text,
        ])],
    );

    let strict = SentenceLabeler::new(&cues, Variant::Strict);
    assert_eq!(label_of(&document, &strict, text), Label::Pos);
}

#[test]
fn strict_variant_suppresses_citation_sentences() {
    let cues = cues();
    let text = "This confirms earlier work [12,13].";
    let document = article(
        "T6",
        vec![SectionSpec::titled("Limitations").paragraph(&[text])],
    );

    assert_eq!(
        label_of(&document, &SentenceLabeler::new(&cues, Variant::Strict), text),
        Label::Neg
    );
    assert_eq!(
        label_of(&document, &SentenceLabeler::new(&cues, Variant::Loose), text),
        Label::Pos
    );
}

#[test]
fn mixed_section_zone_starts_at_first_limitation_marker() {
    let cues = cues();
    let content = [
        "Our cohort was large and population based.",
        "Outcome data were complete for most participants.",
        "A key limitation is the reliance on self-report.",
        "Dropout differed between arms.",
        "Recall bias cannot be excluded.",
        "Residual confounding may remain.",
    ];
    let document = article(
        "T7",
        vec![SectionSpec::titled("Strengths and Limitations").paragraph(&content)],
    );
    let labeler = SentenceLabeler::new(&cues, Variant::Loose);

    let labels = content
        .iter()
        .map(|text| label_of(&document, &labeler, text))
        .collect::<Vec<_>>();
    assert_eq!(
        labels,
        vec![
            Label::Neg,
            Label::Neg,
            Label::Pos,
            Label::Pos,
            Label::Pos,
            Label::Pos,
        ]
    );
}

#[test]
fn mixed_section_zone_closes_at_strength_marker() {
    let cues = cues();
    let document = article(
        "T8",
        vec![SectionSpec::titled("Limitations and strengths")
            .paragraph(&["The main limitation is the sample size.", "Power was low."])
            .paragraph(&["A major strength is the prospective design."])
            .paragraph(&["Data were collected by trained staff."])],
    );
    let labeler = SentenceLabeler::new(&cues, Variant::Loose);

    assert_eq!(label_of(&document, &labeler, "Power was low."), Label::Pos);
    assert_eq!(
        label_of(&document, &labeler, "A major strength is the prospective design."),
        Label::Pos
    );
    assert_eq!(
        label_of(&document, &labeler, "Data were collected by trained staff."),
        Label::Neg
    );
}

#[test]
fn mixed_section_without_markers_uses_title_order() {
    let cues = cues();
    let document = article(
        "T9",
        vec![SectionSpec::titled("Strengths and weaknesses")
            .paragraph(&["The cohort was large.", "Follow-up was complete."])
            .paragraph(&["Exposure was self-reported.", "Dropout was uneven."])],
    );
    let labeler = SentenceLabeler::new(&cues, Variant::Loose);

    assert_eq!(label_of(&document, &labeler, "The cohort was large."), Label::Neg);
    assert_eq!(label_of(&document, &labeler, "Follow-up was complete."), Label::Pos);
    assert_eq!(label_of(&document, &labeler, "Dropout was uneven."), Label::Pos);
}

#[test]
fn discussion_paragraph_after_introductory_sentence_is_positive() {
    let cues = cues();
    let document = article(
        "T10",
        vec![SectionSpec::titled("Discussion")
            .paragraph(&["We found a strong association."])
            .paragraph(&["Our study has several limitations.", "The sample was small."])],
    );
    let intro = "Our study has several limitations.";
    let content = "The sample was small.";

    for variant in [Variant::Loose, Variant::Baseline, Variant::Strict] {
        let labeler = SentenceLabeler::new(&cues, variant);
        assert_eq!(
            label_of(&document, &labeler, "We found a strong association."),
            Label::Neg
        );
        assert_eq!(label_of(&document, &labeler, content), Label::Pos);
    }

    assert_eq!(
        label_of(&document, &SentenceLabeler::new(&cues, Variant::Loose), intro),
        Label::Pos
    );
    assert_eq!(
        label_of(&document, &SentenceLabeler::new(&cues, Variant::Strict), intro),
        Label::Neg
    );
}

#[test]
fn baseline_requires_trailing_keyword_cue() {
    let cues = cues();
    let document = article(
        "T11",
        vec![SectionSpec::titled("Discussion").paragraph(&[
            "Limitations of this work are discussed next.",
            "The sample was small.",
        ])],
    );

    assert_eq!(
        label_of(
            &document,
            &SentenceLabeler::new(&cues, Variant::Loose),
            "The sample was small."
        ),
        Label::Pos
    );
    assert_eq!(
        label_of(
            &document,
            &SentenceLabeler::new(&cues, Variant::Baseline),
            "The sample was small."
        ),
        Label::Neg
    );
}

#[test]
fn loose_variant_ignores_cues_inside_citations() {
    let cues = cues();
    let document = article(
        "T12",
        vec![SectionSpec::titled("Discussion").paragraph(&[
            "Smith et al. described similar limitations.",
            "Their sample was small.",
        ])],
    );
    let text = "Their sample was small.";

    assert_eq!(
        label_of(&document, &SentenceLabeler::new(&cues, Variant::Loose), text),
        Label::Neg
    );
    assert_eq!(
        label_of(&document, &SentenceLabeler::new(&cues, Variant::Strict), text),
        Label::Pos
    );
}

#[test]
fn paragraph_only_variant_ignores_section_structure() {
    let cues = cues();
    let raw = r#"
    {
      "text": "The drug lowered blood pressure.\nThe study had some limitations. Only men were enrolled.",
      "sentences": [
        {"begin": 0, "end": 32},
        {"begin": 33, "end": 64},
        {"begin": 65, "end": 88}
      ]
    }
    "#;
    let document = Document::from_json(raw, "PR1").expect("document should parse");
    let labeler = SentenceLabeler::new(&cues, Variant::ParagraphOnly);

    assert_eq!(
        labeler.label_document(&document),
        vec![Label::Neg, Label::Pos, Label::Pos]
    );
    assert_eq!(
        SentenceLabeler::new(&cues, Variant::Loose).label_document(&document),
        vec![Label::Neg, Label::Neg, Label::Neg]
    );
}

#[test]
fn document_level_variant_uses_relaxed_cues_and_whole_mixed_sections() {
    let cues = cues();
    let document = article(
        "T13",
        vec![SectionSpec::titled("Discussion")
            .paragraph(&["We observed a clear dose response."])
            .paragraph(&[
                "One drawback concerns the recruitment window.",
                "Enrollment closed early.",
            ])
            .paragraph(&["Smith et al. noted similar shortcomings.", "Their assay differed."])
            .child(
                SectionSpec::titled("Limitations and strengths")
                    .paragraph(&["The cohort was large.", "Follow-up was complete."]),
            )],
    );

    let document_level = SentenceLabeler::new(&cues, Variant::DocumentLevel);
    let expected = [
        ("We observed a clear dose response.", Label::Neg),
        ("One drawback concerns the recruitment window.", Label::Pos),
        ("Enrollment closed early.", Label::Pos),
        ("Smith et al. noted similar shortcomings.", Label::Neg),
        ("Their assay differed.", Label::Neg),
        ("The cohort was large.", Label::Pos),
        ("Follow-up was complete.", Label::Pos),
    ];
    for (text, label) in expected {
        assert_eq!(label_of(&document, &document_level, text), label, "{text}");
    }

    let loose = SentenceLabeler::new(&cues, Variant::Loose);
    assert_eq!(label_of(&document, &loose, "Enrollment closed early."), Label::Neg);
    assert_eq!(label_of(&document, &loose, "The cohort was large."), Label::Neg);
}
