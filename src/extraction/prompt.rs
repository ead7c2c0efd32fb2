/// System instruction of every extraction call
pub const EXTRACTION_PROMPT: &str = "\
You extract structured facts about a veterinary clinic from the text of its website.

Fill in the fields of the response schema from the website content you are given:
1. name: the full business name of the clinic.
2. phone: one phone number, or a list when several are given.
3. email: one email address, or a list when several are given.
4. address: the full street address with city, state and postal code, or a list for several locations.
5. business_hours: the hours for each day of the week, monday through sunday.
   - When the site only gives the hours as one text that cannot be split by day, give that text as a plain string for the whole field.
   - When a day has the same hours for everything, give them as a plain string such as \"9am-5pm\" or \"Closed\".
   - When a day has different hours per service (regular consultations, emergency, surgery), give an object with a `services` list. For each service:
     * service_name: the name of the service as written on the site.
     * When the hours read clearly as an opening and a closing time, set parsed to true and give open_time and close_time in 24 hour HH:MM form. Set is_24_7 to true for services that never close.
     * Otherwise set parsed to false and copy the original wording into hours_string.
     * notes: anything else stated about the service hours.
   - Leave out days for which no hours are stated.
6. services: every service the clinic offers.
7. staff: every staff member with name and role, plus specialization and bio when stated.
8. faqs: question and answer pairs published on the site.
9. policies: one policy text, or a list of policies.
10. additional_info: other useful facts such as parking, accessibility or languages spoken.

Use only information explicitly stated in the content. Never guess or invent values.
When a field is not found, omit it.";

/// User message carrying the aggregated website text
pub fn content_message(content: &str) -> String {
    format!("Website content:\n\n{content}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_message_wraps_pages() {
        let message = content_message("--- PAGE: https://vet.test/ ---\nHello\n\n");
        assert_eq!(message, "Website content:\n\n--- PAGE: https://vet.test/ ---\nHello\n\n");
    }

    #[test]
    fn test_instructions_forbid_guessing() {
        assert!(EXTRACTION_PROMPT.contains("Never guess or invent values"));
        assert!(EXTRACTION_PROMPT.contains("business_hours"));
    }
}
