//! Validation utilities for the Clinic Supply Management system
//!
//! Includes Japan-specific validations for the fields that end up on
//! faxed purchase-order documents.

// ============================================================================
// Inventory Validations
// ============================================================================

/// Validate a consumption or kit-line quantity
pub fn validate_quantity(quantity: i32) -> Result<(), &'static str> {
    if quantity <= 0 {
        return Err("Quantity must be positive");
    }
    Ok(())
}

/// Validate a stock level (current or minimum)
pub fn validate_stock_level(stock: i32) -> Result<(), &'static str> {
    if stock < 0 {
        return Err("Stock level cannot be negative");
    }
    Ok(())
}

/// Validate the per-box count for box-unit items
pub fn validate_items_per_box(items_per_box: i32) -> Result<(), &'static str> {
    if items_per_box <= 0 {
        return Err("Items per box must be positive");
    }
    Ok(())
}

// ============================================================================
// General Validations
// ============================================================================

/// Validate email format (basic check)
pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if email.contains('@') && email.contains('.') && email.len() >= 5 {
        Ok(())
    } else {
        Err("Invalid email format")
    }
}

/// Validate a record name is non-blank
pub fn validate_name(name: &str) -> Result<(), &'static str> {
    if name.trim().is_empty() {
        return Err("Name must not be blank");
    }
    Ok(())
}

// ============================================================================
// Japan-Specific Validations
// ============================================================================

/// Validate a Japanese fax/phone number.
/// Accepts: 03-1234-5678, 0312345678, +81-3-1234-5678
pub fn validate_japanese_fax(number: &str) -> Result<(), &'static str> {
    let digits: String = number.chars().filter(|c| c.is_ascii_digit()).collect();

    // Domestic format: 10 or 11 digits starting with 0
    if (digits.len() == 10 || digits.len() == 11) && digits.starts_with('0') {
        return Ok(());
    }
    // International format with 81 country code, leading 0 dropped
    if (digits.len() == 11 || digits.len() == 12) && digits.starts_with("81") {
        return Ok(());
    }

    Err("Invalid Japanese fax number format")
}

/// Validate an external patient code.
/// Format: one uppercase letter followed by 3-6 digits (e.g. "P001")
pub fn validate_patient_code(code: &str) -> Result<(), &'static str> {
    let mut chars = code.chars();
    let Some(first) = chars.next() else {
        return Err("Patient code must not be empty");
    };
    if !first.is_ascii_uppercase() {
        return Err("Patient code must start with an uppercase letter");
    }
    let rest: Vec<char> = chars.collect();
    if rest.len() < 3 || rest.len() > 6 || !rest.iter().all(|c| c.is_ascii_digit()) {
        return Err("Patient code must be a letter followed by 3-6 digits");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================================================
    // Inventory Validation Tests
    // ========================================================================

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(100).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-5).is_err());
    }

    #[test]
    fn test_validate_stock_level() {
        assert!(validate_stock_level(0).is_ok());
        assert!(validate_stock_level(500).is_ok());
        assert!(validate_stock_level(-1).is_err());
    }

    #[test]
    fn test_validate_items_per_box() {
        assert!(validate_items_per_box(100).is_ok());
        assert!(validate_items_per_box(1).is_ok());
        assert!(validate_items_per_box(0).is_err());
    }

    // ========================================================================
    // General Validation Tests
    // ========================================================================

    #[test]
    fn test_validate_email_valid() {
        assert!(validate_email("contact@sample-med.co.jp").is_ok());
        assert!(validate_email("info@medical-supply.co.jp").is_ok());
    }

    #[test]
    fn test_validate_email_invalid() {
        assert!(validate_email("invalid").is_err());
        assert!(validate_email("no@domain").is_err());
        assert!(validate_email("@.").is_err());
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Disposable gloves M").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name("   ").is_err());
    }

    // ========================================================================
    // Japan-Specific Validation Tests
    // ========================================================================

    #[test]
    fn test_validate_japanese_fax_valid() {
        // Tokyo landline with dashes
        assert!(validate_japanese_fax("03-1234-5678").is_ok());
        // Without dashes
        assert!(validate_japanese_fax("0312345678").is_ok());
        // Osaka
        assert!(validate_japanese_fax("06-8765-4321").is_ok());
        // Mobile (11 digits)
        assert!(validate_japanese_fax("090-1111-2222").is_ok());
        // International format
        assert!(validate_japanese_fax("+81-3-1234-5678").is_ok());
    }

    #[test]
    fn test_validate_japanese_fax_invalid() {
        assert!(validate_japanese_fax("12345").is_err());
        assert!(validate_japanese_fax("1234567890").is_err()); // No leading 0
        assert!(validate_japanese_fax("abcdefghij").is_err());
        assert!(validate_japanese_fax("").is_err());
    }

    #[test]
    fn test_validate_patient_code_valid() {
        assert!(validate_patient_code("P001").is_ok());
        assert!(validate_patient_code("K123456").is_ok());
    }

    #[test]
    fn test_validate_patient_code_invalid() {
        assert!(validate_patient_code("").is_err());
        assert!(validate_patient_code("p001").is_err()); // Lowercase
        assert!(validate_patient_code("P01").is_err()); // Too short
        assert!(validate_patient_code("P1234567").is_err()); // Too long
        assert!(validate_patient_code("PABC").is_err()); // Not digits
    }
}
