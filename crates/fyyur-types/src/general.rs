use phf::phf_set;

static US_STATES: phf::Set<&'static str> = phf_set! {
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "DC", "FL", "GA", "HI", "ID", "IL",
    "IN", "IA", "KS", "KY", "LA", "ME", "MT", "NE", "NV", "NH", "NJ", "NM", "NY", "NC",
    "ND", "OH", "OK", "OR", "MD", "MA", "MI", "MN", "MS", "MO", "PA", "RI", "SC", "SD",
    "TN", "TX", "UT", "VT", "VA", "WA", "WV", "WI", "WY", "PR", "GU", "VI", "AS", "MP",
};

pub fn is_us_state(code: &str) -> bool {
    US_STATES.contains(code)
}

/// garde validator for two letter state codes
pub fn is_valid_state(state: &str, _ctx: &()) -> garde::Result {
    if is_us_state(state) {
        Ok(())
    } else {
        Err(garde::Error::new(format!("unknown state code {state}")))
    }
}

/// garde validator factory: description must be present when the flag is set
pub fn required_if(flag: &bool) -> impl FnOnce(&Option<String>, &()) -> garde::Result + '_ {
    move |value, _| match (flag, value) {
        (true, None) => Err(garde::Error::new("description is required when seeking")),
        _ => Ok(()),
    }
}
