//! Built-in question bank. Guarantees the game is playable without external config.

use crate::domain::{AnswerLabel, Question};

pub fn seed_questions() -> Vec<Question> {
  vec![
    Question {
      text: "教育科技在未來十年最有可能改變哪一項教學元素？".into(),
      options: vec![
        "A. 學科內容本身".into(),
        "B. 教師的角色與教學方式".into(),
        "C. 教室的地板設計".into(),
      ],
      answer: AnswerLabel::B,
    },
    Question {
      text: "下列哪一項是虛擬實境（VR）與擴增實境（AR）在教育現場應用時常見的挑戰？".into(),
      options: vec![
        "A. 學生對科技失去興趣".into(),
        "B. 教材難以轉換為科技內容".into(),
        "C. 設備與技術成本高".into(),
      ],
      answer: AnswerLabel::C,
    },
    Question {
      text: "數位落差對學生有什麼主要影響？".into(),
      options: vec![
        "A. 提高成績一致性".into(),
        "B. 強化群體合作能力".into(),
        "C. 造成學習機會與成果的不平等".into(),
      ],
      answer: AnswerLabel::C,
    },
  ]
}
