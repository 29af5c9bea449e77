/// Prompt answered locally with [`PATIENT_HISTORY_HTML`].
pub const PATIENT_DATA_PROMPT: &str = "get patient data";

/// Canned diagnosis history. Served byte-for-byte, leading newline and
/// indentation included.
pub const PATIENT_HISTORY_HTML: &str = r#"
      <div>
        <h2>Patient Diagnosis History:</h2>
        <ul>
          <li>
            <strong>Headache</strong><br>
            <strong>Date:</strong> 2024-07-01<br>
            <strong>Diagnosis:</strong> Headache<br>
            <strong>Treatment:</strong> Pain relief medication
          </li>
          <li>
            <strong>Broken Leg</strong><br>
            <strong>Date:</strong> 2024-06-15<br>
            <strong>Diagnosis:</strong> Fractured femur<br>
            <strong>Treatment:</strong> Cast and rest
          </li>
          <li>
            <strong>Flu</strong><br>
            <strong>Date:</strong> 2024-05-20<br>
            <strong>Diagnosis:</strong> Influenza<br>
            <strong>Treatment:</strong> Rest, fluids, and antiviral medication
          </li>
        </ul>
      </div>
    "#;
