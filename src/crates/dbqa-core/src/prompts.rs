//! Prompt templates for the generation and synthesis steps.

/// Build the prompt for the query-generation step.
///
/// `top_k` is a row-limit hint passed to the model; it is a request, not an
/// enforced constraint.
pub fn query_prompt(dialect: &str, top_k: usize, table_info: &str, question: &str) -> String {
    format!(
        "Given an input question, create a syntactically correct {dialect} query to\n\
         run to help find the answer. Unless the user specifies in his question a\n\
         specific number of examples they wish to obtain, always limit your query to\n\
         at most {top_k} results. You can order the results by a relevant column to\n\
         return the most interesting examples in the database.\n\
         \n\
         Never query for all the columns from a specific table, only ask for a the\n\
         few relevant columns given the question.\n\
         \n\
         Pay attention to use only the column names that you can see in the schema\n\
         description. Be careful to not query for columns that do not exist. Also,\n\
         pay attention to which column is in which table.\n\
         \n\
         Only use the following tables:\n\
         {table_info}\n\
         \n\
         Question: {question}"
    )
}

/// Build the prompt for the answer-synthesis step.
pub fn answer_prompt(question: &str, query: &str, result: &str) -> String {
    format!(
        "Given the following user question, corresponding SQL query, \
         and SQL result, answer the user question.\n\n\
         Question: {question}\n\
         SQL Query: {query}\n\
         SQL Result: {result}"
    )
}
