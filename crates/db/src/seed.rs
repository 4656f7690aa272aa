use model::Question;

const IMAGES: &str = "https://3958257.fs1.hubspotusercontent-na1.net/hubfs/3958257";

fn image(name: &str) -> String {
    format!("{IMAGES}/{name}")
}

/// Question set written to a fresh question file.
pub fn default_questions() -> Vec<Question> {
    vec![
        Question::multiple_choice(
            "1",
            "What is Proax's new campaign name?",
            &["Power to the Panel", "Industry First", "Boots on the Ground", "Smart Automation"],
            "Boots on the Ground",
            20,
        )
        .with_image(&image("boots-on-the-ground-french.png")),
        Question::multiple_choice("2", "What year was Proax founded?", &["1955", "1962", "1965", "1970"], "1962", 15),
        Question::multiple_choice(
            "3",
            "Which of the following are part of Proax's Custom Enclosure Services?",
            &[
                "Precision drilling, tapping, and milling",
                "Custom cutouts for plates, doors, and housing",
                "Pre-assembly with accessories",
                "All of the above",
            ],
            "All of the above",
            15,
        )
        .with_image(&image("remlive.png")),
        Question::multiple_choice(
            "4",
            "Which product category is NOT offered by Proax?",
            &["Industrial Communication & Networking", "Extrusions", "Hydraulics", "Machine Safety"],
            "Hydraulics",
            20,
        ),
        Question::multiple_choice(
            "5",
            "Which of these Proax campaigns offers in-stock items shipped the same day?",
            &["Phoenix Contact Switches", "ABB Circuit Breakers", "SMC AC-D Series FRL", "All of them"],
            "All of them",
            10,
        ),
        Question::yes_no("6", "Is Proax proudly Canadian owned and operated?", "Yes", 10)
            .with_alt("Proax est-elle fièrement canadienne?", &[], "Oui")
            .with_image(&image("proudly-canadian.png")),
        Question::multiple_choice(
            "7",
            "How many locations does Proax have in Canada?",
            &["10", "11", "13", "15"],
            "13",
            10,
        )
        .with_image(&image("locations-fr.png")),
        Question::multiple_choice(
            "8",
            "What is the official website address of Proax?",
            &["proax.com", "proax.ca", "shop.proax.ca", "proaxglobal.com"],
            "proax.ca",
            10,
        )
        .with_image(&image("proax.png")),
        Question::multiple_choice(
            "9",
            "How many PROOF OF CONCEPT CENTERS does Proax operate?",
            &["3", "4", "6", "8"],
            "6",
            10,
        ),
        Question::multiple_choice("10", "How many DESIGN & BUILD SHOPS does Proax have?", &["2", "4", "6", "8"], "4", 10),
        Question::multiple_choice(
            "11",
            "What's the next Proax solution coming really soon?",
            &["Vision inspection", "Wireless sensors", "Proax Conveyor solutions", "Robotics-as-a-service"],
            "Proax Conveyor solutions",
            10,
        )
        .with_image(&image("conveyors.png")),
    ]
}
