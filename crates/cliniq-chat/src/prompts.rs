//! Prompt templates for the clinic assistant.

/// Profile placeholder when a patient has no stored profile yet.
pub const DEFAULT_PROFILE: &str = "No existing patient profile found.";

/// History placeholder used by the profile updater on first contact.
pub const DEFAULT_HISTORY: &str = "No existing history.";

/// System message framing the assistant's role, with the patient's
/// stored profile inlined.
pub fn assistant_system_prompt(clinic_name: &str, profile: &str) -> String {
    format!(
        "You are a helpful medical assistant for {clinic_name}.\n\
         Use the patient's history to provide relevant, personalized \
         appointment scheduling or advice.\n\
         Patient profile: {profile}"
    )
}

/// Instruction asking the model to fold the latest conversation turns
/// into the stored patient profile.
pub fn profile_update_prompt(profile: &str) -> String {
    format!(
        "Update the patient's medical/appointment profile with new information.\n\
         \n\
         CURRENT PROFILE:\n\
         {profile}\n\
         \n\
         ANALYZE FOR:\n\
         1. Appointment history (dates, times, no-shows)\n\
         2. Medical preferences or concerns\n\
         3. Previous diagnoses or treatments\n\
         4. Medication usage or allergies\n\
         5. Follow-up needs\n\
         \n\
         Focus on verified appointment and medical details only. \
         Summarize key points clearly.\n\
         \n\
         Update the profile based on this conversation:"
    )
}

/// Fixed urgent-instruction text returned on the emergency path.
pub fn emergency_instruction(urgent_line: &str) -> String {
    format!(
        "We've detected an emergency. Please contact emergency services \
         immediately or call our 24/7 urgent line: {urgent_line}."
    )
}
