use chrono::Utc;
use tracing::{debug, warn};

use super::extract::FeedbackSections;
use super::fallback::{fallback_coaching, fallback_feedback};
use super::record::{
    clamp_score, format_elapsed, AnalysisItem, Evaluation, InterviewRecord, Provenance,
    QnaFeedback, RecordConfiguration, RecordedUtterance, Source,
};
use crate::backend::{CoachPayload, FeedbackPayload};
use crate::session::{StagedInterview, Transcript};

/// Points per detected gesture, capped at 100
const GESTURE_POINTS: usize = 20;

/// Build the interview record from the staged session and whatever remote
/// analysis was obtained. Never fails: a missing payload is replaced with
/// fixed fallback content before the same derivation runs.
pub fn aggregate(
    staged: &StagedInterview,
    feedback: Option<FeedbackPayload>,
    coaching: Option<CoachPayload>,
) -> InterviewRecord {
    let provenance = Provenance {
        feedback: if feedback.is_some() { Source::Remote } else { Source::Fallback },
        coaching: if coaching.is_some() { Source::Remote } else { Source::Fallback },
    };

    let feedback = feedback.unwrap_or_else(fallback_feedback);
    let coaching = coaching.unwrap_or_else(fallback_coaching);

    debug!(
        "Aggregating {} (feedback={:?}, coaching={:?})",
        staged.session_id, provenance.feedback, provenance.coaching
    );

    InterviewRecord {
        session_id: staged.session_id.clone(),
        configuration: RecordConfiguration {
            persona: staged.config.persona,
            interview_type: staged.config.interview_type,
            focus_areas: staged.config.focus_areas.clone(),
            job_link: staged.config.job_link.clone(),
            duration_secs: (staged.transcript.span_ms().max(0) / 1000) as u64,
        },
        metadata: feedback.metadata.clone(),
        transcript: relative_transcript(&staged.transcript),
        evaluation: evaluation(&staged.session_id, &feedback),
        qna_feedback: qna_feedback(&feedback),
        tone_voice: tone_voice(&feedback),
        body_language: body_language(&coaching),
        provenance,
        created_at: Utc::now(),
    }
}

fn evaluation(session_id: &str, feedback: &FeedbackPayload) -> Evaluation {
    let summary = &feedback.analysis.overall_feedback;
    let metrics = &feedback.analysis.performance_metrics;
    let sections = FeedbackSections::parse(summary);

    if sections.is_unmatched() && !summary.trim().is_empty() {
        warn!(
            "Feedback summary for {} has no Strengths/Areas for Improvement sections; lists left empty",
            session_id
        );
    }

    Evaluation {
        overall_score: clamp_score(metrics.average_score * 100.0),
        overall_rating: metrics.overall_rating.clone(),
        summary: summary.clone(),
        strengths: sections.strengths.unwrap_or_default(),
        areas_for_improvement: sections.areas_for_improvement.unwrap_or_default(),
    }
}

fn qna_feedback(feedback: &FeedbackPayload) -> Vec<QnaFeedback> {
    feedback
        .answers
        .iter()
        .map(|answer| {
            let question = if answer.question.trim().is_empty() {
                feedback
                    .questions
                    .get(answer.question_id)
                    .cloned()
                    .unwrap_or_default()
            } else {
                answer.question.clone()
            };

            QnaFeedback {
                question,
                went_well: answer.evaluation.strengths.join("\n"),
                improvements: answer.evaluation.areas_for_improvement.join("\n"),
            }
        })
        .collect()
}

fn tone_voice(feedback: &FeedbackPayload) -> Vec<AnalysisItem> {
    feedback
        .sentiment_analysis
        .emotion_analysis
        .iter()
        .map(|(emotion, data)| AnalysisItem {
            attribute: capitalize(emotion),
            score: clamp_score(data.score),
            explanation: data.evidence.clone(),
        })
        .collect()
}

fn body_language(coaching: &CoachPayload) -> Vec<AnalysisItem> {
    let eye_contact = clamp_score(coaching.eye_contact);
    let posture = clamp_score(coaching.posture);
    let gestures = coaching
        .gestures
        .len()
        .saturating_mul(GESTURE_POINTS)
        .min(100) as u8;

    let mut eye_text = format!("Maintained eye contact for {}% of the interview.", eye_contact);
    if let Some(tip) = recommendation_about(&coaching.recommendations, &["eye"]) {
        eye_text = format!("{} {}", eye_text, tip);
    }

    let mut posture_text = format!("Held an upright, engaged posture {}% of the time.", posture);
    if let Some(tip) = recommendation_about(&coaching.recommendations, &["posture", "upright", "sit"]) {
        posture_text = format!("{} {}", posture_text, tip);
    }

    let mut gesture_text = if coaching.gestures.is_empty() {
        "No notable gestures detected.".to_string()
    } else {
        coaching.gestures.join("; ")
    };
    if let Some(tip) = recommendation_about(&coaching.recommendations, &["gesture", "hand"]) {
        gesture_text = format!("{}. {}", gesture_text.trim_end_matches('.'), tip);
    }

    vec![
        AnalysisItem {
            attribute: "Eye Contact".to_string(),
            score: eye_contact,
            explanation: eye_text,
        },
        AnalysisItem {
            attribute: "Posture".to_string(),
            score: posture,
            explanation: posture_text,
        },
        AnalysisItem {
            attribute: "Gestures".to_string(),
            score: gestures,
            explanation: gesture_text,
        },
    ]
}

fn recommendation_about<'a>(recommendations: &'a [String], keywords: &[&str]) -> Option<&'a str> {
    recommendations
        .iter()
        .find(|r| {
            let lower = r.to_lowercase();
            keywords.iter().any(|k| lower.contains(k))
        })
        .map(String::as_str)
}

fn relative_transcript(transcript: &Transcript) -> Vec<RecordedUtterance> {
    let origin = transcript.utterances().first().map_or(0, |u| u.occurred_at);

    transcript
        .iter()
        .map(|utterance| {
            let offset_ms = (utterance.occurred_at - origin).max(0);
            RecordedUtterance {
                speaker: utterance.speaker,
                text: utterance.text.clone(),
                offset_ms,
                timestamp: format_elapsed((offset_ms / 1000) as u64),
            }
        })
        .collect()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
