//! Answer prompt template

use crate::models::RetrievedPassage;

const PERSONA: &str = "Bạn là một trợ lý AI thông minh và hữu ích. Hãy trả lời câu hỏi dựa trên thông tin được cung cấp và lịch sử cuộc trò chuyện.";

/// Sentence the model must use when neither context nor history can answer.
pub const FALLBACK_ANSWER: &str =
    "Xin lỗi, hiện tại chúng tôi không thể xử lý yêu cầu này. Bạn có thể thử một yêu cầu khác.";

fn instructions() -> String {
    [
        "- Trả lời bằng tiếng Việt".to_string(),
        "- Dựa trên thông tin được cung cấp và lịch sử trò chuyện".to_string(),
        "- Nếu câu hỏi liên quan đến cuộc trò chuyện trước đó, hãy tham khảo lịch sử".to_string(),
        format!(
            "- Nếu không có thông tin, chỉ cần trả lời \"{}\"",
            FALLBACK_ANSWER
        ),
        "- Trả lời ngắn gọn và dễ hiểu".to_string(),
        "- Giọng điệu thân thiện, lịch sự".to_string(),
        "- Sử dụng định dạng markdown nếu cần".to_string(),
        "- Khi câu hỏi yêu cầu giải thích chi tiết, hãy cố gắng diễn giải dễ hiểu và đầy đủ nhất có thể".to_string(),
        "- Nếu user hỏi về cuộc trò chuyện trước (\"vừa nãy\", \"câu hỏi trước\", etc.), hãy tham khảo lịch sử".to_string(),
    ]
    .join("\n")
}

/// Retrieved passages joined one per line.
pub fn join_passages(passages: &[RetrievedPassage]) -> String {
    passages
        .iter()
        .map(|p| p.text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Compose the generation prompt from history, reference context and the current query.
pub fn build_prompt(conversation_context: &str, context: &str, query: &str) -> String {
    format!(
        "\n{persona}\n\n{conversation_context}\n\nThông tin tham khảo:\n{context}\n\nCâu hỏi hiện tại: {query}\n\nHướng dẫn:\n{instructions}\n",
        persona = PERSONA,
        conversation_context = conversation_context,
        context = context,
        query = query,
        instructions = instructions(),
    )
}
