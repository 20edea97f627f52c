//! Prompt construction for the ranking backend.

use catalog::Activity;
use matching::MatchingCriteria;

/// System message sent with every ranking request
pub const SYSTEM_PROMPT: &str = "You are an expert system for matching volunteers with suitable \
activities based on personality, skills, and preferences. Always respond with valid JSON.";

const NOT_SPECIFIED: &str = "None specified";

/// Render the user profile and every candidate into one instruction.
///
/// Candidates appear in the order given, separated by `---`. The
/// instruction ends with the exact JSON shape the parser expects.
pub fn build_instruction(criteria: &MatchingCriteria, activities: &[Activity]) -> String {
    let availability = serde_json::to_string(&criteria.availability).unwrap_or_default();

    let mut prompt = String::new();
    prompt.push_str(
        "You are an expert in volunteer matching for corporate social responsibility programs.\n\
         Analyze the user profile and score each volunteering activity based on compatibility.\n\n",
    );

    prompt.push_str("User Profile:\n");
    prompt.push_str(&format!("- Strengths: {}\n", criteria.strengths.join(", ")));
    prompt.push_str(&format!("- Personality Type: {}\n", criteria.personality_type));
    prompt.push_str(&format!("- Interests: {}\n", criteria.interests.join(", ")));
    prompt.push_str(&format!("- Office: {}\n", criteria.office));
    prompt.push_str(&format!("- Department: {}\n", criteria.department));
    prompt.push_str(&format!("- Availability: {}\n\n", availability));

    prompt.push_str("Activities to score:\n");
    let blocks: Vec<String> = activities.iter().map(describe_activity).collect();
    prompt.push_str(&blocks.join("\n---\n"));

    prompt.push_str(
        "\nFor each activity, provide:\n\
         1. A compatibility score from 1-100 (100 being a perfect match)\n\
         2. 2-3 specific reasons why this activity matches or doesn't match the user's profile\n\
         3. Consider factors like: personality alignment, skill requirements, interests overlap, \
         location compatibility, time commitment\n\n\
         Respond in JSON format:\n\
         {\n  \"matches\": [\n    {\n      \"activityId\": number,\n      \
         \"score\": number,\n      \
         \"reasons\": [\"reason1\", \"reason2\", \"reason3\"]\n    }\n  ]\n}\n",
    );

    prompt
}

fn describe_activity(activity: &Activity) -> String {
    let skills = match &activity.required_skills {
        Some(skills) if !skills.is_empty() => skills.join(", "),
        _ => NOT_SPECIFIED.to_string(),
    };
    let sdg_goals = match &activity.sdg_goals {
        Some(goals) if !goals.is_empty() => goals
            .iter()
            .map(|g| g.to_string())
            .collect::<Vec<_>>()
            .join(", "),
        _ => NOT_SPECIFIED.to_string(),
    };
    let duration = activity
        .duration_hours
        .map(|hours| format!("{hours} hours"))
        .unwrap_or_else(|| NOT_SPECIFIED.to_string());

    format!(
        "Activity ID: {}\nTitle: {}\nDescription: {}\nSkills Required: {}\nLocation: {}\n\
         Virtual: {}\nSDG Goals: {}\nDuration: {}\n",
        activity.id,
        activity.title,
        activity.description,
        skills,
        activity.location.as_deref().unwrap_or(NOT_SPECIFIED),
        activity.is_virtual,
        sdg_goals,
        duration,
    )
}
