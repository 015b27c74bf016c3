//! Prompt generator — the daily question rotation.
//!
//! Purely deterministic: the question is picked by the day of year modulo
//! 21, so the full rotation repeats every three weeks. No persistence and
//! no randomness; dates are local wall-clock.

use chrono::{Datelike, Local, NaiveDate, Weekday};

/// The 21 question templates, three weeks of seven. `{age}` is substituted
/// with the child's age.
const KID_QUESTIONS: [&str; 21] = [
    // Week 1
    "what’s the silliest thing you said today?",
    "what made you laugh the hardest this week?",
    "what’s your favorite thing to do with Mommy or Daddy?",
    "if you could have any superpower, what would it be?",
    "what’s the best part of being {age} years old?",
    "who’s your best friend and why?",
    "what do you want to be when you grow up?",
    // Week 2
    "what’s your favorite food and why do you love it?",
    "if you could go anywhere in the world, where would you go?",
    "what’s the funniest dream you ever had?",
    "what do you like most about bedtime?",
    "who makes you feel the safest?",
    "what’s your favorite color and why?",
    "what’s the best gift you ever got?",
    // Week 3
    "what do you like most about our house?",
    "what’s your favorite thing to do outside?",
    "if animals could talk, which one would be your best friend?",
    "what’s the yummiest thing you ate this week?",
    "what do you love most about your family?",
    "what’s your favorite story or book?",
    "what makes you feel proud?",
];

/// Weekdays on which prompts go out.
///
/// Nothing in this service consumes this yet — there is no dispatcher; only
/// the reply side is implemented. Exported for the eventual send job.
pub const SEND_DAYS: [Weekday; 3] = [Weekday::Mon, Weekday::Thu, Weekday::Sun];

/// Build the prompt for a specific date. Deterministic: same date, name,
/// and age always produce the same string.
pub fn prompt_for_date(kid_name: &str, kid_age: u32, date: NaiveDate) -> String {
    // ordinal0: Jan 1 is day 0, matching the rotation's epoch.
    let day_index = (date.ordinal0() as usize) % KID_QUESTIONS.len();
    let question = KID_QUESTIONS[day_index].replace("{age}", &kid_age.to_string());
    format!("{kid_name}, {question} Reply!")
}

/// Build today's prompt using the local wall-clock date.
pub fn today_prompt(kid_name: &str, kid_age: u32) -> String {
    prompt_for_date(kid_name, kid_age, Local::now().date_naive())
}
