//! Course head parsing: header, instructor, section note and start date.

use tracing::debug;

use super::classify::{TokenClass, is_instructor};
use super::cursor::Cursor;
use super::error::{FieldError, FormatField};
use super::record::CourseRecord;

/// Outcome of reading a course head.
#[derive(Debug)]
pub(crate) enum CourseHead {
    /// Head complete; books follow.
    Opened(CourseRecord),
    /// The section note ran off the end of the page before a start date.
    Discarded,
}

/// Reads a course head starting at a header token.
///
/// Grammar: `HEADER [INSTRUCTOR] [SECTION NOTE...] START_DATE`. The instructor
/// is only read when the token after the header is not a date; the section
/// note is every token up to the next date.
pub(crate) fn read_course_head(cursor: &mut Cursor<'_>) -> Result<CourseHead, FieldError> {
    let header = cursor.take().unwrap_or_default();
    let mut course = CourseRecord::from_header(header)?;

    if !at_date(cursor) {
        let token = cursor.current_or_empty();
        if !is_instructor(token) {
            return Err(FieldError::new(FormatField::Instructor, token));
        }
        course.instructor = Some(token.to_string());
        cursor.take();
    }

    if !at_date(cursor) {
        let Some(note) = read_section_note(cursor) else {
            debug!(course = %course.label(), "section note ran off the page; course dropped");
            return Ok(CourseHead::Discarded);
        };
        course.section_note = Some(note);
    }

    let token = cursor.current_or_empty();
    if !TokenClass::Date.matches(token) {
        return Err(FieldError::new(FormatField::ClassStartDate, token));
    }
    course.start_date = token.to_string();
    cursor.take();

    Ok(CourseHead::Opened(course))
}

/// Concatenates untrimmed tokens up to the next date.
///
/// Returns `None` if the page ends first.
fn read_section_note(cursor: &mut Cursor<'_>) -> Option<String> {
    let mut note = String::new();
    while let Some(fragment) = cursor.current_raw() {
        if TokenClass::Date.matches(fragment) {
            return Some(note.trim().to_string());
        }
        note.push_str(fragment);
        cursor.take_raw();
    }
    None
}

fn at_date(cursor: &Cursor<'_>) -> bool {
    cursor.current_is(|t| TokenClass::Date.matches(t))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn page(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|t| (*t).to_string()).collect()
    }

    fn opened(head: CourseHead) -> CourseRecord {
        match head {
            CourseHead::Opened(course) => course,
            CourseHead::Discarded => panic!("expected an opened course"),
        }
    }

    #[test]
    fn test_read_course_head_with_instructor() {
        let tokens = page(&["BIO 202 03", "SMITH J", "01/15/2025", "NEXT"]);
        let mut cursor = Cursor::new(&tokens);
        let course = opened(read_course_head(&mut cursor).unwrap());
        assert_eq!(course.department, "BIO");
        assert_eq!(course.instructor.as_deref(), Some("SMITH J"));
        assert!(course.section_note.is_none());
        assert_eq!(course.start_date, "01/15/2025");
        assert_eq!(cursor.current(), Some("NEXT"));
    }

    #[test]
    fn test_read_course_head_date_directly_after_header() {
        let tokens = page(&["ENG 101 01", "08/25/2025"]);
        let mut cursor = Cursor::new(&tokens);
        let course = opened(read_course_head(&mut cursor).unwrap());
        assert!(course.instructor.is_none());
        assert_eq!(course.start_date, "08/25/2025");
        assert!(cursor.at_end());
    }

    #[test]
    fn test_read_course_head_section_note_joins_untrimmed() {
        let tokens = page(&[
            "ART 110 02",
            "STAFF",
            "HYBRID ",
            "SECTION",
            " - ONLINE ",
            "09/01/2025",
        ]);
        let mut cursor = Cursor::new(&tokens);
        let course = opened(read_course_head(&mut cursor).unwrap());
        assert_eq!(course.instructor.as_deref(), Some("STAFF"));
        assert_eq!(course.section_note.as_deref(), Some("HYBRID SECTION - ONLINE"));
    }

    #[test]
    fn test_read_course_head_invalid_instructor() {
        let tokens = page(&["BIO 202 03", "tba", "01/15/2025"]);
        let mut cursor = Cursor::new(&tokens);
        let err = read_course_head(&mut cursor).unwrap_err();
        assert_eq!(err.field, FormatField::Instructor);
        assert_eq!(err.value, "tba");
    }

    #[test]
    fn test_read_course_head_header_at_page_end_is_instructor_error() {
        let tokens = page(&["BIO 202 03"]);
        let mut cursor = Cursor::new(&tokens);
        let err = read_course_head(&mut cursor).unwrap_err();
        assert_eq!(err.field, FormatField::Instructor);
        assert_eq!(err.value, "");
    }

    #[test]
    fn test_read_course_head_note_off_page_is_discarded() {
        let tokens = page(&["BIO 202 03", "SMITH J", "SEE NOTE", "MORE"]);
        let mut cursor = Cursor::new(&tokens);
        let head = read_course_head(&mut cursor).unwrap();
        assert!(matches!(head, CourseHead::Discarded));
        assert!(cursor.at_end());
    }

    #[test]
    fn test_read_course_head_instructor_last_on_page_is_discarded() {
        let tokens = page(&["BIO 202 03", "SMITH J"]);
        let mut cursor = Cursor::new(&tokens);
        let head = read_course_head(&mut cursor).unwrap();
        assert!(matches!(head, CourseHead::Discarded));
    }
}
