use crate::contract::model::JobSpecs;
use crate::domain::ports::NotesSummary;

fn yes_no(on: bool) -> &'static str {
    if on {
        "Yes"
    } else {
        "No"
    }
}

pub fn estimate_prompt(specs: &JobSpecs) -> String {
    let addons = specs
        .addons
        .entries()
        .iter()
        .map(|(label, on)| format!("{label}: {}", yes_no(*on)))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "You are an expert window installation time estimator.\n\n\
         Based on the following information, estimate the time it will take to complete the job.\n\n\
         Number of windows: {}\n\
         Total square meters: {}\n\
         Total circumference: {}\n\
         Add-ons: {addons}\n\
         Notes: {}\n\n\
         Provide the estimated time in the format: \"X hours\" or \"Y.Z hours\". \
         Reply with the estimate only.",
        specs.window_count, specs.square_meters, specs.circumference, specs.notes,
    )
}

pub fn enhance_notes_prompt(notes: &str, summary: &NotesSummary) -> String {
    let labels = summary.addons.selected_labels();
    let addons = if labels.is_empty() {
        "None".to_string()
    } else {
        labels.join(", ")
    };

    format!(
        "You are helping a window installation manager enhance job notes for their team.\n\n\
         Summarize the key details of the job and add the summary to the beginning of the notes. \
         Reply with the enhanced notes only.\n\n\
         Contract Number: {}\n\
         Client Address: {}\n\
         Number of Windows: {}\n\
         Square Meters: {}\n\
         Circumference: {}\n\
         Add-ons: {addons}\n\n\
         Original Notes: {notes}\n\n\
         Enhanced Notes:",
        summary.contract_number,
        summary.client_address,
        summary.window_count,
        summary.square_meters,
        summary.circumference,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::model::Addons;

    #[test]
    fn estimate_prompt_lists_every_addon() {
        let specs = JobSpecs {
            window_count: 6,
            square_meters: 8.5,
            circumference: 22.0,
            addons: Addons {
                outer_sills: true,
                ..Default::default()
            },
            notes: "third floor".into(),
        };
        let prompt = estimate_prompt(&specs);
        assert!(prompt.contains("Number of windows: 6"));
        assert!(prompt.contains("Total square meters: 8.5"));
        assert!(prompt.contains(
            "Inner Sills: No, Outer Sills: Yes, Finishing: No, Tape: No, Extras: No"
        ));
        assert!(prompt.contains("Notes: third floor"));
        assert!(prompt.contains("\"X hours\""));
    }

    #[test]
    fn notes_prompt_joins_selected_addons() {
        let summary = NotesSummary {
            contract_number: "C-42".into(),
            client_address: "Elm St 9".into(),
            window_count: 2,
            square_meters: 3.0,
            circumference: 7.5,
            addons: Addons {
                inner_sills: true,
                tape: true,
                ..Default::default()
            },
        };
        let prompt = enhance_notes_prompt("bring ladder", &summary);
        assert!(prompt.contains("Contract Number: C-42"));
        assert!(prompt.contains("Add-ons: Inner Sills, Tape"));
        assert!(prompt.contains("Original Notes: bring ladder"));

        let bare = NotesSummary {
            addons: Addons::default(),
            ..summary
        };
        assert!(enhance_notes_prompt("", &bare).contains("Add-ons: None"));
    }
}
