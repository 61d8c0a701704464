//! Interactive quiz loop for the `quiz` command

use crate::cli::output::{render_answer_feedback, render_question, render_quiz_result};
use crate::content::tour::{parse_answer, quiz_questions, QuizResult};
use crate::error::{Result, TxLensError};
use std::io::{BufRead, Write};

/// Ask every question on `output`, reading one answer per line from `input`
///
/// Unreadable answers are asked again. Running out of input before the last
/// question is an error.
pub fn run_quiz<R: BufRead, W: Write>(mut input: R, mut output: W) -> Result<QuizResult> {
    let questions = quiz_questions();
    let mut score = 0;

    for (index, question) in questions.iter().enumerate() {
        writeln!(output, "{}", render_question(index + 1, questions.len(), question))?;
        let correct = loop {
            write!(output, "> ")?;
            output.flush()?;

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                return Err(TxLensError::InvalidInput(
                    "Quiz ended before every question was answered".to_string(),
                ));
            }
            match parse_answer(&line).and_then(|answer| question.check(answer)) {
                Ok(correct) => break correct,
                Err(e) => writeln!(output, "{e}")?,
            }
        };
        if correct {
            score += 1;
        }
        writeln!(output, "{}\n", render_answer_feedback(question, correct))?;
    }

    let result = QuizResult::new(score, questions.len());
    writeln!(output, "{}", render_quiz_result(&result))?;
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_all_correct() {
        let input = Cursor::new("b\n2\nB\nb\nb\nb\nb\n");
        let mut output = Vec::new();
        let result = run_quiz(input, &mut output).unwrap();

        assert_eq!(result.score, 7);
        assert_eq!(result.percentage, 100);
        let text = String::from_utf8(output).unwrap();
        assert_eq!(text.matches("Correct!").count(), 7);
        assert!(text.ends_with("Excellent work! You understand Bitcoin transactions well.\n"));
    }

    #[test]
    fn test_bad_answers_are_asked_again() {
        let input = Cursor::new("z\n0\n\na\nb\nb\nb\nb\nb\nb\n");
        let mut output = Vec::new();
        let result = run_quiz(input, &mut output).unwrap();

        assert_eq!(result.score, 6);
        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("Answer must be between 1 and 4"));
        assert!(text.contains("Invalid answer: 0"));
        assert!(text.contains("Not quite. The answer is b) "));
    }

    #[test]
    fn test_running_out_of_input() {
        let mut output = Vec::new();
        let err = run_quiz(Cursor::new("b\nb\n"), &mut output).unwrap_err();
        assert!(matches!(err, TxLensError::InvalidInput(_)));
    }
}
