pub(super) type CityRow = (&'static str, &'static [&'static str]);

pub(super) const SUGGESTION_TABLE: &[(&str, &[CityRow])] = &[
    (
        "summer",
        &[
            ("delhi", &["Cotton", "Watermelon", "Maize"]),
            ("kerala", &["Rice", "Coconut", "Banana"]),
            ("bangalore", &["Rice", "Papaya", "Drumstick"]),
            ("nellore", &["Cotton", "Maize", "Sunflower"]),
            ("hyderabad", &["Cotton", "Groundnuts", "Maize"]),
            ("secunderabad", &["Maize", "Groundnuts", "Sunflower"]),
            ("visakhapatnam", &["Maize", "Cotton", "Sunflower"]),
            ("guntur", &["Chillies", "Tobacco", "Cotton"]),
            ("krishna", &["Rice", "Sugarcane", "Mango"]),
            ("east godavari", &["Rice", "Coconut", "Banana"]),
            ("west godavari", &["Rice", "Sugarcane", "Mango"]),
            ("prakasam", &["Cotton", "Maize", "Groundnuts"]),
            ("kadapa", &["Maize", "Pulses", "Sunflower"]),
        ],
    ),
    (
        "winter",
        &[
            ("delhi", &["Wheat", "Mustard", "Tomato"]),
            ("mumbai", &["Rice", "Sugarcane", "Banana"]),
            ("kerala", &["Wheat", "Kidneybean", "Pomegranate"]),
            ("bangalore", &["Rice", "Papaya", "Drumstick"]),
            ("nellore", &["Wheat", "Barley", "Mustard"]),
            ("hyderabad", &["Chickpeas", "Wheat", "Barley"]),
            ("secunderabad", &["Chickpeas", "Barley", "Mustard"]),
            ("visakhapatnam", &["Barley", "Mustard", "Wheat"]),
            ("guntur", &["Wheat", "Barley", "Pulses"]),
            ("krishna", &["Wheat", "Barley", "Groundnuts"]),
            ("east godavari", &["Wheat", "Barley", "Sesame"]),
            ("west godavari", &["Wheat", "Barley", "Chillies"]),
            ("prakasam", &["Wheat", "Barley", "Pulses"]),
            ("kadapa", &["Wheat", "Barley", "Mustard"]),
        ],
    ),
    (
        "rainy",
        &[
            ("nellore", &["Rice", "Maize", "Pulses"]),
            ("hyderabad", &["Okra", "Brinjal", "Tomato"]),
            ("secunderabad", &["Rice", "Brinjal", "Okra"]),
            ("visakhapatnam", &["Maize", "Pulses", "Tomato"]),
            ("guntur", &["Rice", "Pulses", "Chillies"]),
            ("krishna", &["Rice", "Maize", "Pulses"]),
            ("east godavari", &["Rice", "Maize", "Pulses"]),
            ("west godavari", &["Rice", "Maize", "Pulses"]),
            ("prakasam", &["Rice", "Maize", "Pulses"]),
            ("kadapa", &["Rice", "Maize", "Pulses"]),
        ],
    ),
];
